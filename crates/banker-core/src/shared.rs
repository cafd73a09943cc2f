//! Single-lock wrapper for drivers that share one state across threads

use crate::enumerate::SequenceEnumerator;
use crate::error::RequestError;
use crate::matrix::Units;
use crate::request::{Grant, RequestProcessor};
use crate::safety::{SafeSequence, SafetyChecker, SafetyResult};
use crate::state::{ResourceState, Snapshot};
use parking_lot::Mutex;

/// A [`ResourceState`] behind one exclusive lock
///
/// Every operation holds the lock from start to finish, so a tentative
/// grant and its rollback are never visible to another caller.
pub struct SharedState {
    inner: Mutex<ResourceState>,
}

impl SharedState {
    /// Wrap a state
    pub fn new(state: ResourceState) -> Self {
        Self {
            inner: Mutex::new(state),
        }
    }

    /// Run the safety check under the lock
    pub fn check_safety(&self) -> SafetyResult {
        SafetyChecker::check(&*self.inner.lock())
    }

    /// Enumerate safe sequences under the lock
    pub fn enumerate_safe_sequences(&self) -> Vec<SafeSequence> {
        let state = self.inner.lock();
        SequenceEnumerator::new(&state).run()
    }

    /// Submit a request under the lock
    pub fn submit_request(&self, pid: usize, request: &[Units]) -> Result<Grant, RequestError> {
        RequestProcessor::submit(&mut *self.inner.lock(), pid, request)
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot()
    }

    /// Run `f` with the state borrowed under the lock
    pub fn with_state<T>(&self, f: impl FnOnce(&ResourceState) -> T) -> T {
        f(&*self.inner.lock())
    }

    /// Unwrap the state
    pub fn into_inner(self) -> ResourceState {
        self.inner.into_inner()
    }
}

impl From<ResourceState> for SharedState {
    fn from(state: ResourceState) -> Self {
        Self::new(state)
    }
}
