//! The sparse linked-matrix representation and the search drivers.
//!
//! Everything here works on 0-based row and column numbers as seen by the
//! caller; internally the node pool reserves index 0 for the head record.

use std::error::Error;
use std::fmt;

use crate::dlx::callback::{Callback, SearchState};

/// A single link record of [`Matrix`].
///
/// All four link fields are indices into the owning pool; the arena never
/// hands out references between records.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(test, derive(Debug))]
struct Node {
    // row, col: 1-based b/c of head node (only internally)
    row: usize,
    col: usize,
    left: usize,
    right: usize,
    up: usize,
    down: usize,
}

/// Column selection heuristic used by the search drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Branch on the first active mandatory column in the column ring.
    First,
    /// Branch on the mandatory column with the fewest live cells, ties
    /// broken by ring position (Knuth's minimum remaining values rule).
    MinimumSize,
}

impl Default for Strategy {
    fn default() -> Strategy {
        Strategy::MinimumSize
    }
}

/// An error returned when a generated row references a column index outside
/// `[0, columns)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnOutOfRange {
    /// The offending column index.
    pub column: usize,
    /// Total number of columns in the matrix.
    pub columns: usize,
}

impl fmt::Display for ColumnOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "column index {} is out of range for a matrix with {} columns",
            self.column, self.columns
        )
    }
}

impl Error for ColumnOutOfRange {}

/// A sparse matrix representation of an exact cover problem used for the
/// DLX algorithm.
///
/// Columns are split into a mandatory prefix and an optional suffix.
/// Mandatory columns must be covered exactly once by a solution; optional
/// columns may be covered at most once and never start a branch.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(Debug))]
pub struct Matrix {
    row_cnt: usize,
    primary: usize,
    secondary: usize,
    pool: Vec<Node>, // head: 0, columns: 1..=primary+secondary
    col_size: Vec<usize>,
}

// Internal state of the iterative driver. `Explore` corresponds to entering
// a recursion level, `TryRow` to the branch loop, `Backtrack` to the cleanup
// after a branch returns.
#[derive(Clone, Copy)]
enum Task {
    Explore,
    TryRow,
    Backtrack,
}

// Methods for initializing Matrix
impl Matrix {
    const HEAD: usize = 0;

    /// Creates a matrix with `primary` mandatory and `secondary` optional
    /// columns and no rows. Mandatory columns precede optional ones in the
    /// column ring.
    pub fn new(primary: usize, secondary: usize) -> Matrix {
        let col_cnt = primary + secondary;
        let mut pool = Vec::with_capacity(col_cnt + 1);
        pool.push(Node::default());

        let mut mat = Matrix {
            row_cnt: 0,
            primary,
            secondary,
            pool,
            col_size: vec![0; col_cnt + 1],
        };
        for col_num in 1..=col_cnt {
            let col = mat.create_node(0, col_num);
            mat.insert_right(col - 1, col);
        }
        mat
    }

    /// Convenience constructor that adds every row of `rows` in order.
    pub fn with_rows(
        primary: usize,
        secondary: usize,
        rows: &[&[usize]],
    ) -> Result<Matrix, ColumnOutOfRange> {
        let mut mat = Matrix::new(primary, secondary);
        for row in rows {
            mat.add_row(row)?;
        }
        Ok(mat)
    }

    /// Adds a row covering the given columns, indexed from 0.
    ///
    /// A row with no columns is not representable in exact cover; it still
    /// consumes a row number (so matrix rows stay aligned with the caller's
    /// numbering) but creates no cells and can never appear in a solution.
    /// On an out-of-range column the matrix is left untouched.
    pub fn add_row(&mut self, row: &[usize]) -> Result<(), ColumnOutOfRange> {
        let col_cnt = self.primary + self.secondary;
        for &c in row {
            if c >= col_cnt {
                return Err(ColumnOutOfRange {
                    column: c,
                    columns: col_cnt,
                });
            }
        }

        self.row_cnt += 1;
        let row_num = self.row_cnt;
        let mut left_node = 0;

        for &c in row {
            let col_num = c + 1;
            let node = self.create_node(row_num, col_num);

            self.insert_down(self.pool[col_num].up, node);
            if left_node != 0 {
                self.insert_right(left_node, node);
            }

            self.col_size[col_num] += 1;
            left_node = node;
        }
        Ok(())
    }

    /// Number of mandatory columns.
    pub fn primary(&self) -> usize {
        self.primary
    }

    /// Number of optional columns.
    pub fn secondary(&self) -> usize {
        self.secondary
    }

    /// Number of rows added so far, empty ones included.
    pub fn rows(&self) -> usize {
        self.row_cnt
    }
}

// Main algorithm (dancing links)
impl Matrix {
    /// Runs the recursive search driver, delivering every exact cover to
    /// `callback` in a deterministic order.
    ///
    /// Solutions are slices of 0-based row numbers in order of descent. The
    /// callback may stop the search through its [`SearchState`] argument; a
    /// terminated search unwinds without restoring covered columns, so the
    /// matrix should be considered spent afterwards.
    ///
    /// A matrix without mandatory columns has nothing to branch on and
    /// yields no solutions.
    pub fn solve(&mut self, strategy: Strategy, callback: &mut impl Callback) {
        if self.primary == 0 {
            return;
        }
        let mut state = SearchState::default();
        let mut path = Vec::new();
        self.recursive_solve(strategy, &mut path, &mut state, callback);
    }

    fn recursive_solve(
        &mut self,
        strategy: Strategy,
        path: &mut Vec<usize>,
        state: &mut SearchState,
        callback: &mut impl Callback,
    ) {
        if state.is_terminated() {
            return;
        }

        let col = match self.choose_col(strategy) {
            Some(col) => col,
            None => {
                // Every remaining active column is optional, so the path
                // covers all mandatory columns and is a complete solution.
                callback.on_solution(path, state);
                return;
            }
        };

        self.cover_col(col);

        let mut r = self.pool[col].down;
        while r != col {
            path.push(self.select_row(r));

            self.recursive_solve(strategy, path, state, callback);

            if state.is_terminated() {
                return;
            }

            self.unselect_row(r);
            path.pop();

            r = self.pool[r].down;
        }

        self.uncover_col(col);
    }

    /// Runs the state-stack search driver.
    ///
    /// Observably equivalent to [`solve`](Matrix::solve): same solutions,
    /// same order, same termination semantics. Useful when recursion depth
    /// is a concern.
    pub fn solve_iterative(&mut self, strategy: Strategy, callback: &mut impl Callback) {
        if self.primary == 0 {
            return;
        }

        let mut state = SearchState::default();
        let mut path = Vec::new();
        let mut col_stack: Vec<usize> = Vec::new();
        let mut row_stack: Vec<usize> = Vec::new();
        let mut task_stack = vec![Task::Explore];

        while let Some(task) = task_stack.pop() {
            if state.is_terminated() {
                return;
            }

            match task {
                Task::Explore => match self.choose_col(strategy) {
                    None => callback.on_solution(&path, &mut state),
                    Some(col) => {
                        self.cover_col(col);
                        col_stack.push(col);
                        row_stack.push(self.pool[col].down);
                        task_stack.push(Task::TryRow);
                    }
                },
                Task::TryRow => {
                    let col = *col_stack.last().unwrap();
                    let r = *row_stack.last().unwrap();

                    if r == col {
                        // Every branch of this column has been tried.
                        self.uncover_col(col);
                        col_stack.pop();
                        row_stack.pop();
                    } else {
                        path.push(self.select_row(r));
                        task_stack.push(Task::Backtrack);
                        task_stack.push(Task::Explore);
                    }
                }
                Task::Backtrack => {
                    let r = *row_stack.last().unwrap();

                    self.unselect_row(r);
                    path.pop();

                    *row_stack.last_mut().unwrap() = self.pool[r].down;
                    task_stack.push(Task::TryRow);
                }
            }
        }
    }
}

// Helper methods
impl Matrix {
    fn create_node(&mut self, row: usize, col: usize) -> usize {
        let idx = self.pool.len();
        self.pool.push(Node {
            row,
            col,
            left: idx,
            right: idx,
            up: idx,
            down: idx,
        });
        idx
    }

    fn insert_right(&mut self, at: usize, node: usize) {
        let right = self.pool[at].right;
        self.pool[node].right = right;
        self.pool[right].left = node;
        self.pool[node].left = at;
        self.pool[at].right = node;
    }

    fn insert_down(&mut self, at: usize, node: usize) {
        let down = self.pool[at].down;
        self.pool[node].down = down;
        self.pool[down].up = node;
        self.pool[node].up = at;
        self.pool[at].down = node;
    }

    /// Chooses the next column to branch on, or `None` when every active
    /// column is optional (the current path is then a solution).
    #[inline]
    fn choose_col(&self, strategy: Strategy) -> Option<usize> {
        match strategy {
            Strategy::First => {
                let col = self.pool[Matrix::HEAD].right;
                if col == Matrix::HEAD || col > self.primary {
                    None
                } else {
                    Some(col)
                }
            }
            Strategy::MinimumSize => {
                let mut best = None;
                let mut size = usize::MAX;

                let mut col = self.pool[Matrix::HEAD].right;
                while col != Matrix::HEAD && col <= self.primary {
                    if self.col_size[col] < size {
                        best = Some(col);
                        size = self.col_size[col];
                    }
                    col = self.pool[col].right;
                }
                best
            }
        }
    }

    /// Covers every other column of row `r`'s ring and returns the 0-based
    /// number of the row, committing it to the current branch.
    #[inline]
    fn select_row(&mut self, r: usize) -> usize {
        let mut j = self.pool[r].right;
        while j != r {
            self.cover_col(self.pool[j].col);
            j = self.pool[j].right;
        }
        self.pool[r].row - 1
    }

    /// Exact inverse of [`select_row`](Matrix::select_row).
    #[inline]
    fn unselect_row(&mut self, r: usize) {
        let mut j = self.pool[r].left;
        while j != r {
            self.uncover_col(self.pool[j].col);
            j = self.pool[j].left;
        }
    }

    #[inline]
    fn cover_col(&mut self, col: usize) {
        let Node { left, right, .. } = self.pool[col];
        self.pool[left].right = right;
        self.pool[right].left = left;

        let mut i = self.pool[col].down;
        while i != col {
            let mut j = self.pool[i].right;
            while j != i {
                let Node { col: c, up, down, .. } = self.pool[j];
                self.pool[up].down = down;
                self.pool[down].up = up;

                self.col_size[c] -= 1;
                j = self.pool[j].right;
            }

            i = self.pool[i].down;
        }
    }

    #[inline]
    fn uncover_col(&mut self, col: usize) {
        let mut i = self.pool[col].up;
        while i != col {
            let mut j = self.pool[i].left;
            while j != i {
                let Node { col: c, up, down, .. } = self.pool[j];
                self.pool[up].down = j;
                self.pool[down].up = j;

                self.col_size[c] += 1;
                j = self.pool[j].left;
            }

            i = self.pool[i].up;
        }

        let Node { left, right, .. } = self.pool[col];
        self.pool[left].right = col;
        self.pool[right].left = col;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dlx::callback::SolutionCollector;
    use rand::prelude::*;

    // Knuth's canonical 6x7 example; the unique cover is rows {0, 3, 4}.
    fn knuth_matrix() -> Matrix {
        Matrix::with_rows(
            7,
            0,
            &[
                &[2, 4, 5],
                &[0, 3, 6],
                &[1, 2, 5],
                &[0, 3],
                &[1, 6],
                &[3, 4, 6],
            ],
        )
        .unwrap()
    }

    fn random_matrix(rng: &mut StdRng) -> Matrix {
        let primary = rng.gen_range(1..8);
        let secondary = rng.gen_range(0..4);
        let rows = rng.gen_range(0..16);
        let mut mat = Matrix::new(primary, secondary);
        for _ in 0..rows {
            let row: Vec<usize> = (0..primary + secondary)
                .filter(|_| rng.gen_bool(0.4))
                .collect();
            mat.add_row(&row).unwrap();
        }
        mat
    }

    #[test]
    fn default_strategy_is_minimum_size() {
        assert_eq!(Strategy::default(), Strategy::MinimumSize);
    }

    #[test]
    fn solve_should_find_unique_cover_in_descent_order() {
        let mut mat = knuth_matrix();
        let mut collected = SolutionCollector::default();
        mat.solve(Strategy::MinimumSize, &mut collected);
        assert_eq!(collected.solutions, vec![vec![3, 0, 4]]);
    }

    #[test]
    fn first_strategy_should_find_the_same_cover_in_another_order() {
        let mut mat = knuth_matrix();
        let mut collected = SolutionCollector::default();
        mat.solve(Strategy::First, &mut collected);
        assert_eq!(collected.solutions, vec![vec![3, 4, 0]]);
    }

    #[test]
    fn solve_should_find_multiple_solutions() {
        let mut mat = Matrix::with_rows(4, 0, &[&[0], &[1], &[2], &[3], &[0, 2], &[1, 3]]).unwrap();
        let mut collected = SolutionCollector::default();
        mat.solve(Strategy::MinimumSize, &mut collected);
        assert_eq!(collected.solutions.len(), 4);
    }

    #[test]
    fn matrix_without_mandatory_columns_yields_nothing() {
        let mut mat = Matrix::with_rows(0, 2, &[&[0], &[1]]).unwrap();
        let mut collected = SolutionCollector::default();
        mat.solve(Strategy::MinimumSize, &mut collected);
        mat.solve_iterative(Strategy::MinimumSize, &mut collected);
        assert!(collected.solutions.is_empty());
    }

    #[test]
    fn optional_columns_may_stay_uncovered() {
        // Both rows cover the optional column 2, so only one of them fits;
        // row 2 covers nothing optional.
        let mut mat = Matrix::with_rows(2, 1, &[&[0, 2], &[1, 2], &[1]]).unwrap();
        let mut collected = SolutionCollector::default();
        mat.solve(Strategy::MinimumSize, &mut collected);
        assert_eq!(collected.solutions, vec![vec![0, 2]]);
    }

    #[test]
    fn add_row_should_reject_out_of_range_columns() {
        let mut mat = Matrix::new(3, 0);
        let before = mat.clone();
        assert_eq!(
            mat.add_row(&[1, 3]),
            Err(ColumnOutOfRange {
                column: 3,
                columns: 3
            })
        );
        assert!(mat == before);
    }

    #[test]
    fn empty_rows_keep_row_numbers_aligned() {
        let mut mat = Matrix::new(2, 0);
        mat.add_row(&[]).unwrap();
        mat.add_row(&[0]).unwrap();
        mat.add_row(&[1]).unwrap();

        let mut collected = SolutionCollector::default();
        mat.solve(Strategy::MinimumSize, &mut collected);
        assert_eq!(collected.solutions, vec![vec![1, 2]]);
    }

    #[test]
    fn iterative_solve_matches_recursive_solve() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..40 {
            let mat = random_matrix(&mut rng);
            for strategy in [Strategy::First, Strategy::MinimumSize] {
                let mut recursive = SolutionCollector::default();
                mat.clone().solve(strategy, &mut recursive);

                let mut iterative = SolutionCollector::default();
                mat.clone().solve_iterative(strategy, &mut iterative);

                assert_eq!(recursive.solutions, iterative.solutions);
            }
        }
    }

    #[test]
    fn cover_uncover_restores_the_arena() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..40 {
            let mut mat = random_matrix(&mut rng);
            let col_cnt = mat.primary() + mat.secondary();
            let snapshot = mat.clone();

            // Matched pairs on every column.
            for col in 1..=col_cnt {
                mat.cover_col(col);
                mat.uncover_col(col);
                assert!(mat == snapshot);
            }

            // A random cover sequence, undone in exact reverse order.
            let mut seq: Vec<usize> = (1..=col_cnt).collect();
            seq.shuffle(&mut rng);
            seq.truncate(rng.gen_range(0..=col_cnt));
            for &col in &seq {
                mat.cover_col(col);
            }
            for &col in seq.iter().rev() {
                mat.uncover_col(col);
            }
            assert!(mat == snapshot);

            // A full search unwinds back to the initial arena.
            for strategy in [Strategy::First, Strategy::MinimumSize] {
                let mut collected = SolutionCollector::default();
                mat.solve(strategy, &mut collected);
                assert!(mat == snapshot);

                mat.solve_iterative(strategy, &mut collected);
                assert!(mat == snapshot);
            }
        }
    }

    #[test]
    fn termination_stops_the_search_immediately() {
        let mut mat = Matrix::with_rows(1, 0, &[&[0], &[0], &[0]]).unwrap();
        let mut collected = SolutionCollector::with_limit(1);
        mat.solve(Strategy::First, &mut collected);
        assert_eq!(collected.solutions, vec![vec![0]]);
    }
}
