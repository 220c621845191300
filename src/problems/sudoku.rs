//! Classic 9×9 Sudoku as an exact cover problem.
//!
//! Every cell/digit candidate becomes a matrix row covering four mandatory
//! constraints: the cell is filled, the rank holds the digit, the file
//! holds the digit, and the box holds the digit. Givens contribute a single
//! candidate row, which is how the puzzle state prunes the search.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::dlx::matrix::Strategy;
use crate::problem::Problem;
use crate::solver::solve_first;

const SIZE: usize = 9;
const BOX: usize = 3;
const CELLS: usize = SIZE * SIZE;

/// A digit assignment to a single cell, the row id of [`Sudoku`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub row: usize,
    pub col: usize,
    /// The assigned digit, `1..=9`.
    pub digit: u8,
}

/// A set of Sudoku digits `1..=9` backed by a bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigitSet(u16);

impl DigitSet {
    /// Inserts a digit, returning `false` if it was already present.
    pub fn insert(&mut self, digit: u8) -> bool {
        let bit = 1u16 << digit;
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    pub fn contains(&self, digit: u8) -> bool {
        self.0 & (1u16 << digit) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// A 9×9 Sudoku grid in row-major order; `0` marks an empty cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sudoku {
    cells: [u8; CELLS],
}

impl Sudoku {
    /// Parses a 1D 81-character grid string. Digits `1..=9` are givens,
    /// `0` or `.` marks an empty cell. Returns `None` for malformed input
    /// and for grids whose givens already conflict.
    pub fn parse(raw: &str) -> Option<Sudoku> {
        let mut cells = [0u8; CELLS];
        let mut count = 0;

        for (i, ch) in raw.chars().enumerate() {
            if i >= CELLS {
                return None;
            }
            cells[i] = match ch {
                '.' | '0' => 0,
                '1'..='9' => ch as u8 - b'0',
                _ => return None,
            };
            count += 1;
        }
        if count != CELLS {
            return None;
        }

        let sudoku = Sudoku { cells };
        if !sudoku.lines_consistent() {
            return None;
        }
        Some(sudoku)
    }

    /// Returns the digit at `(row, col)`, `0` when the cell is empty.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * SIZE + col]
    }

    /// Returns whether every cell is filled and no rank, file, or box
    /// repeats a digit.
    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(|&d| d != 0) && self.lines_consistent()
    }

    /// Solves the grid, returning the first completed grid found or `None`
    /// when the givens admit no solution.
    pub fn solve(&self) -> Option<Sudoku> {
        // The encoder only emits in-range columns, so the build cannot fail.
        let solution = solve_first(self, Strategy::MinimumSize).ok()?;
        let solution = solution?;

        let mut solved = self.clone();
        for &Assignment { row, col, digit } in solution.rows() {
            solved.cells[row * SIZE + col] = digit;
        }
        Some(solved)
    }

    /// Generates a puzzle with `clues` givens using a naive procedure:
    /// shuffle the digits of the first rank, complete the grid with the
    /// solver, then blank random cells. The result is always solvable but
    /// carries no uniqueness guarantee.
    pub fn random<R: Rng>(rng: &mut R, clues: usize) -> Sudoku {
        let mut first_rank: [u8; SIZE] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        first_rank.shuffle(rng);

        let mut seed = Sudoku { cells: [0; CELLS] };
        seed.cells[..SIZE].copy_from_slice(&first_rank);
        let mut grid = seed.solve().unwrap(); // a permuted rank always extends to a full grid

        let clues = clues.min(CELLS);
        let mut order: Vec<usize> = (0..CELLS).collect();
        order.shuffle(rng);
        for &cell in order.iter().take(CELLS - clues) {
            grid.cells[cell] = 0;
        }
        grid
    }

    /// Checks that no given digit repeats within a rank, file, or box.
    fn lines_consistent(&self) -> bool {
        let mut ranks = [DigitSet::default(); SIZE];
        let mut files = [DigitSet::default(); SIZE];
        let mut boxes = [DigitSet::default(); SIZE];

        for row in 0..SIZE {
            for col in 0..SIZE {
                let digit = self.cells[row * SIZE + col];
                if digit == 0 {
                    continue;
                }
                let b = (row / BOX) * BOX + col / BOX;
                if !ranks[row].insert(digit)
                    || !files[col].insert(digit)
                    || !boxes[b].insert(digit)
                {
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Display for Sudoku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..SIZE {
                match self.get(row, col) {
                    0 => write!(f, ".")?,
                    d => write!(f, "{}", d)?,
                }
            }
        }
        Ok(())
    }
}

impl Problem for Sudoku {
    type RowId = Assignment;

    fn constraints(&self) -> usize {
        // Cell, rank-digit, file-digit and box-digit blocks.
        4 * CELLS
    }

    fn generate_rows(&self, emit: &mut dyn FnMut(Assignment, &[usize])) {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let given = self.cells[row * SIZE + col];
                let b = (row / BOX) * BOX + col / BOX;

                for digit in 1..=SIZE as u8 {
                    if given != 0 && digit != given {
                        continue;
                    }
                    let d = (digit - 1) as usize;
                    let cols = [
                        row * SIZE + col,
                        CELLS + row * SIZE + d,
                        2 * CELLS + col * SIZE + d,
                        3 * CELLS + b * SIZE + d,
                    ];
                    emit(Assignment { row, col, digit }, &cols);
                }
            }
        }
    }
}
