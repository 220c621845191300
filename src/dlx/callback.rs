//! Basic callback objects to pass to the DLX search drivers.

/// Cooperative termination flag shared between a search driver and its
/// callback.
///
/// A fresh state is created for every solve and discarded with it.
#[derive(Debug, Default)]
pub struct SearchState {
    terminated: bool,
}

impl SearchState {
    /// Asks the driver to stop. Once the current callback returns, the
    /// search unwinds without delivering further solutions.
    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    /// Returns whether termination has been requested.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

/// An interface of callback objects to pass to the DLX search drivers.
pub trait Callback {
    /// Called once per exact cover with the 0-based matrix row numbers in
    /// order of descent. The slice is only valid for the duration of the
    /// call; copy it to keep it.
    fn on_solution(&mut self, sol: &[usize], state: &mut SearchState);
}

/// A simple callback that collects solutions into a vector, optionally
/// terminating the search once a limit is reached.
#[derive(Debug, Default)]
pub struct SolutionCollector {
    pub solutions: Vec<Vec<usize>>,
    limit: Option<usize>,
}

impl SolutionCollector {
    /// Collects at most `limit` solutions, then terminates the search.
    pub fn with_limit(limit: usize) -> SolutionCollector {
        SolutionCollector {
            solutions: Vec::new(),
            limit: Some(limit),
        }
    }
}

impl Callback for SolutionCollector {
    fn on_solution(&mut self, sol: &[usize], state: &mut SearchState) {
        self.solutions.push(sol.to_vec());
        if self.limit.map_or(false, |limit| self.solutions.len() >= limit) {
            state.terminate();
        }
    }
}
