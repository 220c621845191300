//! The problem contract consumed by the solver, plus a generic builder for
//! ad-hoc exact cover problems.
//!
//! Complex problems (such as Sudoku or N-Queens) implement [`Problem`]
//! directly; see the [`problems`](crate::problems) module for examples.

use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

/// Base trait for subset names and set elements.
pub trait Value: Clone + Hash + Eq {}
impl<T: Clone + Hash + Eq> Value for T {}

/// An exact cover problem description.
///
/// The matrix has `constraints()` mandatory columns followed by
/// `optional_constraints()` optional ones. `generate_rows` must call `emit`
/// once per row with an opaque row id and the 0-based indices of the
/// columns the row covers, each in
/// `[0, constraints() + optional_constraints())`.
///
/// Row and column numbering is fixed by emission order; together with the
/// strategy it determines the order in which solutions are found.
pub trait Problem {
    /// Opaque key identifying a row in delivered solutions.
    type RowId: Clone;

    /// Number of mandatory constraints (each covered exactly once).
    fn constraints(&self) -> usize;

    /// Number of optional constraints (each covered at most once).
    fn optional_constraints(&self) -> usize {
        0
    }

    /// Enumerates the rows of the constraint matrix.
    fn generate_rows(&self, emit: &mut dyn FnMut(Self::RowId, &[usize]));
}

/// An ad-hoc exact cover problem built from named subsets over arbitrary
/// elements.
///
/// The order of the subsets and the elements is the insertion order. It
/// uses [`IndexMap`] and [`IndexSet`] internally to keep track of it; the
/// subset order may affect the order of the solutions. Mandatory elements
/// are numbered before optional ones no matter how their insertions
/// interleave.
#[derive(Clone)]
#[cfg_attr(test, derive(Debug))]
pub struct SubsetProblem<N: Value, E: Value> {
    mandatory: IndexSet<E>,
    optional: IndexSet<E>,
    subsets: IndexMap<N, Vec<E>>,
}

impl<N: Value, E: Value> Default for SubsetProblem<N, E> {
    fn default() -> SubsetProblem<N, E> {
        SubsetProblem {
            mandatory: IndexSet::default(),
            optional: IndexSet::default(),
            subsets: IndexMap::default(),
        }
    }
}

impl<N: Value, E: Value> SubsetProblem<N, E> {
    /// Adds an element that has to be covered exactly once.
    pub fn add_constraint(&mut self, elem: E) {
        self.mandatory.insert(elem);
    }

    /// Adds several mandatory elements.
    pub fn add_constraints<I: IntoIterator<Item = E>>(&mut self, elems: I) {
        for elem in elems {
            self.add_constraint(elem);
        }
    }

    /// Adds an element that may be covered at most once.
    pub fn add_optional_constraint(&mut self, elem: E) {
        self.optional.insert(elem);
    }

    /// Adds several optional elements.
    pub fn add_optional_constraints<I: IntoIterator<Item = E>>(&mut self, elems: I) {
        for elem in elems {
            self.add_optional_constraint(elem);
        }
    }

    /// Adds a subset to the problem.
    ///
    /// If the subset name already exists, it replaces the corresponding
    /// subset. Every element must also be declared as a constraint before
    /// the problem is solved; an undeclared element surfaces as a build
    /// error.
    pub fn add_subset(&mut self, name: N, subset: Vec<E>) {
        self.subsets.insert(name, subset);
    }

    fn column_of(&self, elem: &E) -> usize {
        if let Some(i) = self.mandatory.get_index_of(elem) {
            i
        } else if let Some(i) = self.optional.get_index_of(elem) {
            self.mandatory.len() + i
        } else {
            // One past the last column; rejected by the matrix builder.
            self.mandatory.len() + self.optional.len()
        }
    }
}

impl<N: Value, E: Value> Problem for SubsetProblem<N, E> {
    type RowId = N;

    fn constraints(&self) -> usize {
        self.mandatory.len()
    }

    fn optional_constraints(&self) -> usize {
        self.optional.len()
    }

    fn generate_rows(&self, emit: &mut dyn FnMut(N, &[usize])) {
        for (name, subset) in &self.subsets {
            let cols: Vec<usize> = subset.iter().map(|e| self.column_of(e)).collect();
            emit(name.clone(), &cols);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mandatory_elements_are_numbered_before_optional_ones() {
        let mut prob: SubsetProblem<&str, char> = SubsetProblem::default();
        prob.add_optional_constraint('x');
        prob.add_constraint('a');
        prob.add_optional_constraint('y');
        prob.add_constraint('b');
        prob.add_subset("s", vec!['a', 'b', 'x', 'y']);

        assert_eq!(prob.constraints(), 2);
        assert_eq!(prob.optional_constraints(), 2);

        let mut emitted = Vec::new();
        prob.generate_rows(&mut |name, cols| emitted.push((name, cols.to_vec())));
        assert_eq!(emitted, vec![("s", vec![0, 1, 2, 3])]);
    }

    #[test]
    fn undeclared_elements_map_past_the_last_column() {
        let mut prob: SubsetProblem<&str, char> = SubsetProblem::default();
        prob.add_constraint('a');
        prob.add_subset("s", vec!['a', 'z']);

        let mut emitted = Vec::new();
        prob.generate_rows(&mut |name, cols| emitted.push((name, cols.to_vec())));
        assert_eq!(emitted, vec![("s", vec![0, 1])]);
    }

    #[test]
    fn reinserting_a_subset_replaces_it() {
        let mut prob: SubsetProblem<&str, u32> = SubsetProblem::default();
        prob.add_constraints(0..2);
        prob.add_subset("s", vec![0]);
        prob.add_subset("s", vec![0, 1]);

        let mut emitted = Vec::new();
        prob.generate_rows(&mut |name, cols| emitted.push((name, cols.to_vec())));
        assert_eq!(emitted, vec![("s", vec![0, 1])]);
    }
}
