//! Greedy safety check
//!
//! Answers "can every process still finish?" for a state and, when it can,
//! produces one witness completion order.

use crate::matrix::{self, Units};
use crate::state::{ProcessId, ResourceState};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// An order in which processes can complete without deadlock
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SafeSequence(Vec<ProcessId>);

impl SafeSequence {
    /// Create a sequence from process ids
    pub fn new(order: Vec<ProcessId>) -> Self {
        Self(order)
    }

    /// Process ids in completion order
    pub fn as_slice(&self) -> &[ProcessId] {
        &self.0
    }

    /// Raw indices in completion order
    pub fn indices(&self) -> Vec<usize> {
        self.0.iter().map(ProcessId::index).collect()
    }

    /// Number of processes in the sequence
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over process ids
    pub fn iter(&self) -> impl Iterator<Item = &ProcessId> {
        self.0.iter()
    }

    /// Consume into the underlying ids
    pub fn into_inner(self) -> Vec<ProcessId> {
        self.0
    }

    /// Replay this order against `state` and confirm each step is grantable
    ///
    /// True only if the sequence names every process exactly once and each
    /// process's need fits in what the earlier ones released.
    pub fn is_valid_for(&self, state: &ResourceState) -> bool {
        if self.0.len() != state.process_count() {
            return false;
        }
        let mut work = WorkState::new(state);
        for &pid in &self.0 {
            if !state.contains(pid) || work.is_finished(pid) || !work.can_finish(pid) {
                return false;
            }
            work.finish(pid);
        }
        true
    }
}

impl fmt::Display for SafeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pid) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", pid)?;
        }
        Ok(())
    }
}

/// Outcome of a safety check
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyResult {
    /// True if every process can finish
    pub safe: bool,
    /// Witness order when safe; the processes granted before the scan
    /// stalled when unsafe
    pub sequence: SafeSequence,
}

/// Scratch work vector and finished flags over a borrowed state
///
/// Reads Allocation and Need from the state and never writes to it; every
/// simulated grant lands in the private `work` copy of Available.
#[derive(Clone, Debug)]
pub(crate) struct WorkState<'a> {
    state: &'a ResourceState,
    work: Vec<Units>,
    finished: Vec<bool>,
}

impl<'a> WorkState<'a> {
    /// Fresh scratch: Available copied, nothing finished
    pub(crate) fn new(state: &'a ResourceState) -> Self {
        Self {
            state,
            work: state.available().to_vec(),
            finished: vec![false; state.process_count()],
        }
    }

    pub(crate) fn is_finished(&self, pid: ProcessId) -> bool {
        self.finished[pid.index()]
    }

    /// `Need[pid] <= work`
    pub(crate) fn can_finish(&self, pid: ProcessId) -> bool {
        matrix::le(self.state.need().row(pid.index()), &self.work)
    }

    /// Let `pid` run to completion and return its allocation to the pool
    pub(crate) fn finish(&mut self, pid: ProcessId) {
        matrix::add_assign(&mut self.work, self.state.allocation().row(pid.index()));
        self.finished[pid.index()] = true;
    }

    /// Undo [`finish`](Self::finish)
    pub(crate) fn unfinish(&mut self, pid: ProcessId) {
        matrix::sub_assign(&mut self.work, self.state.allocation().row(pid.index()));
        self.finished[pid.index()] = false;
    }

    /// Unfinished process that can be granted right now
    pub(crate) fn grantable(&self, pid: ProcessId) -> bool {
        !self.is_finished(pid) && self.can_finish(pid)
    }

    pub(crate) fn work(&self) -> &[Units] {
        &self.work
    }

    pub(crate) fn state(&self) -> &'a ResourceState {
        self.state
    }
}

/// Banker's safety algorithm
pub struct SafetyChecker;

impl SafetyChecker {
    /// Decide whether `state` is safe
    ///
    /// Each pass scans unfinished processes in ascending id order and grants
    /// every one whose need fits, so a grant early in a pass can unblock a
    /// later process in the same pass. A pass that grants nobody ends the
    /// check. O(n^2 * m) worst case.
    pub fn check(state: &ResourceState) -> SafetyResult {
        let n = state.process_count();
        let mut work = WorkState::new(state);
        let mut order = Vec::with_capacity(n);

        while order.len() < n {
            let mut found = false;
            for pid in state.processes() {
                if work.grantable(pid) {
                    work.finish(pid);
                    order.push(pid);
                    found = true;
                    debug!(%pid, work = ?work.work(), "safety check granted");
                }
            }
            if !found {
                break;
            }
        }

        let safe = order.len() == n;
        debug!(safe, finished = order.len(), processes = n, "safety check done");

        SafetyResult {
            safe,
            sequence: SafeSequence(order),
        }
    }

    /// Shorthand for `check(state).safe`
    pub fn is_safe(state: &ResourceState) -> bool {
        Self::check(state).safe
    }
}
