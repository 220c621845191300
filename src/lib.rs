//! [Exact cover] solver library using Knuth's [dancing links (DLX)] algorithm.
//!
//! [exact cover]: https://en.wikipedia.org/wiki/Exact_cover
//! [dancing links (DLX)]: https://en.wikipedia.org/wiki/Dancing_Links
//!
//! # Concept
//!
//! Many puzzle-like problems, such as Sudoku, the N-Queens puzzle, or
//! polyomino packing, can be modeled as exact cover problems. This library
//! provides an efficient solver for the generic exact cover problem and its
//! relaxation with optional constraints, so that you can model your own
//! problem, solve it, and analyze the solutions by code.
//!
//! The engine enumerates solutions through an inline callback and supports
//! cooperative termination, which the [`solve_first`] and [`solve_many`]
//! wrappers build on.
//!
//! # Basic example
//!
//! ```
//! use dancing_links::{solve_many, Strategy, SubsetProblem};
//!
//! let mut prob = SubsetProblem::default();
//! prob.add_constraints(1..=3);
//! prob.add_subset("A", vec![1, 2, 3]);
//! prob.add_subset("B", vec![1]);
//! prob.add_subset("C", vec![2]);
//! prob.add_subset("D", vec![3]);
//! prob.add_subset("E", vec![1, 2]);
//! prob.add_subset("F", vec![2, 3]);
//!
//! let solutions = solve_many(&prob, Strategy::MinimumSize, None).unwrap();
//! assert_eq!(solutions.len(), 4);
//! ```
//!
//! # Optional constraints
//!
//! An optional (secondary) constraint may be covered at most once but does
//! not have to be covered at all. The N-Queens encoder in
//! [`problems::queens`] uses them for the diagonals; ad-hoc problems
//! declare them with [`SubsetProblem::add_optional_constraint`].

pub mod dlx;
pub mod problem;
pub mod problems;
pub mod solver;

pub use dlx::callback::{Callback, SearchState, SolutionCollector};
pub use dlx::matrix::{ColumnOutOfRange, Matrix, Strategy};
pub use problem::{Problem, SubsetProblem, Value};
pub use solver::{solve, solve_first, solve_many, Solution};
