//! Exhaustive enumeration of safe completion orders
//!
//! Backtracking search over a single scratch [`WorkState`]: each level tries
//! every grantable process as the next to finish, recurses, then undoes the
//! grant before trying the next candidate. Worst case is factorial in `n`,
//! which is acceptable for a diagnostic query.

use crate::safety::{SafeSequence, WorkState};
use crate::state::{ProcessId, ResourceState};
use tracing::debug;

/// Backtracking search for every safe sequence of a state
pub struct SequenceEnumerator<'a> {
    work: WorkState<'a>,
    prefix: Vec<ProcessId>,
    found: Vec<SafeSequence>,
    dead_ends: usize,
}

impl<'a> SequenceEnumerator<'a> {
    /// Prepare a search starting from `state`'s current Available with
    /// nothing finished
    pub fn new(state: &'a ResourceState) -> Self {
        Self {
            work: WorkState::new(state),
            prefix: Vec::with_capacity(state.process_count()),
            found: Vec::new(),
            dead_ends: 0,
        }
    }

    /// Run the search
    ///
    /// Sequences come out in lexicographic order of process id, since each
    /// level tries candidates in ascending order. An unsafe state yields an
    /// empty list.
    pub fn run(mut self) -> Vec<SafeSequence> {
        self.descend();

        debug_assert!(self.prefix.is_empty());
        debug_assert_eq!(self.work.work(), self.work.state().available());

        debug!(
            sequences = self.found.len(),
            dead_ends = self.dead_ends,
            "safe sequence enumeration done"
        );
        self.found
    }

    fn descend(&mut self) {
        let state = self.work.state();
        let mut progressed = false;

        for pid in state.processes() {
            if !self.work.grantable(pid) {
                continue;
            }
            progressed = true;

            self.work.finish(pid);
            self.prefix.push(pid);

            self.descend();

            self.prefix.pop();
            self.work.unfinish(pid);
        }

        if !progressed {
            if self.prefix.len() == state.process_count() {
                self.found.push(SafeSequence::new(self.prefix.clone()));
            } else {
                self.dead_ends += 1;
            }
        }
    }
}
