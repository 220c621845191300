//! Solves a [`Problem`] by building a DLX matrix and driving the search,
//! delivering each exact cover to an inline callback.
//!
//! The callback runs on the calling thread and must return before the
//! search continues; there is no internal concurrency. Independent solves
//! may run concurrently since every solve owns its matrix.

use log::debug;

use crate::dlx::callback::{Callback, SearchState};
use crate::dlx::matrix::{ColumnOutOfRange, Matrix, Strategy};
use crate::problem::Problem;

/// A single exact cover: the ids of the chosen rows, in order of descent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution<R> {
    rows: Vec<R>,
}

impl<R> Solution<R> {
    /// The chosen row ids, in the order the search selected them.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Consumes the solution, returning the row ids.
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

// Maps matrix row numbers back to row ids and hands the materialized
// solution to the user callback.
struct Deliver<'a, R, F> {
    row_ids: &'a [R],
    callback: F,
}

impl<R, F> Callback for Deliver<'_, R, F>
where
    R: Clone,
    F: FnMut(Solution<R>, &mut SearchState),
{
    fn on_solution(&mut self, sol: &[usize], state: &mut SearchState) {
        let solution = Solution {
            rows: sol.iter().map(|&n| self.row_ids[n].clone()).collect(),
        };
        (self.callback)(solution, state);
    }
}

fn build_matrix<P: Problem>(problem: &P) -> Result<(Matrix, Vec<P::RowId>), ColumnOutOfRange> {
    let mut mat = Matrix::new(problem.constraints(), problem.optional_constraints());
    let mut row_ids = Vec::new();
    let mut failed = None;

    problem.generate_rows(&mut |id, cols| {
        if failed.is_some() {
            return;
        }
        row_ids.push(id);
        if let Err(e) = mat.add_row(cols) {
            failed = Some(e);
        }
    });

    match failed {
        Some(e) => Err(e),
        None => {
            debug!(
                "built exact cover matrix: {} mandatory + {} optional columns, {} rows",
                mat.primary(),
                mat.secondary(),
                mat.rows()
            );
            Ok((mat, row_ids))
        }
    }
}

/// Enumerates the exact covers of `problem`, invoking `callback` once per
/// solution found.
///
/// The callback may stop the search by calling [`SearchState::terminate`].
/// A problem with zero mandatory constraints has no matrix to search and
/// yields no solutions.
pub fn solve<P, F>(problem: &P, strategy: Strategy, callback: F) -> Result<(), ColumnOutOfRange>
where
    P: Problem,
    F: FnMut(Solution<P::RowId>, &mut SearchState),
{
    if problem.constraints() == 0 {
        debug!("problem has no mandatory constraints, nothing to search");
        return Ok(());
    }

    let (mut mat, row_ids) = build_matrix(problem)?;
    let mut deliver = Deliver {
        row_ids: &row_ids,
        callback,
    };
    mat.solve(strategy, &mut deliver);
    Ok(())
}

/// Returns the first solution found, or `None` when the problem has no
/// exact cover.
pub fn solve_first<P: Problem>(
    problem: &P,
    strategy: Strategy,
) -> Result<Option<Solution<P::RowId>>, ColumnOutOfRange> {
    let mut first = None;
    solve(problem, strategy, |sol, state| {
        first = Some(sol);
        state.terminate();
    })?;
    Ok(first)
}

/// Collects up to `limit` solutions in discovery order.
///
/// `None` collects every solution; `Some(0)` returns an empty vector
/// without searching.
pub fn solve_many<P: Problem>(
    problem: &P,
    strategy: Strategy,
    limit: Option<usize>,
) -> Result<Vec<Solution<P::RowId>>, ColumnOutOfRange> {
    if limit == Some(0) {
        return Ok(Vec::new());
    }

    let mut solutions = Vec::new();
    solve(problem, strategy, |sol, state| {
        solutions.push(sol);
        if limit.map_or(false, |limit| solutions.len() >= limit) {
            state.terminate();
        }
    })?;
    Ok(solutions)
}
