//! # banker-core
//!
//! Resource-allocation state engine for the Banker's deadlock-avoidance
//! algorithm.
//!
//! This crate provides:
//! - Fixed-shape demand/allocation matrices with load-time validation
//! - The greedy safety check producing one witness completion order
//! - Exhaustive enumeration of every safe completion order
//! - The request/grant/rollback protocol with process completion
//!
//! ## Architecture
//!
//! ```text
//! +------------------+      +------------------+
//! | RequestProcessor | ---> |  SafetyChecker   |
//! +------------------+      +------------------+
//!          |                         |
//!          v                         v
//! +------------------+      +--------------------+
//! |  ResourceState   | <--- | SequenceEnumerator |
//! +------------------+      +--------------------+
//!   Max / Alloc / Need / Available / Total
//! ```
//!
//! ## Usage
//!
//! ```
//! use banker_core::{check_safety, load_state, submit_request, RequestOutcome, Units};
//!
//! let max: Vec<Vec<Units>> = vec![vec![7, 5, 3], vec![3, 2, 2], vec![9, 0, 2], vec![2, 2, 2], vec![4, 3, 3]];
//! let alloc: Vec<Vec<Units>> = vec![vec![0, 1, 0], vec![2, 0, 0], vec![3, 0, 2], vec![2, 1, 1], vec![0, 0, 2]];
//! let mut state = load_state(&max, &alloc, vec![10, 5, 7]).unwrap();
//!
//! assert!(check_safety(&state).safe);
//! let outcome = RequestOutcome::from(&submit_request(&mut state, 1, &[1, 0, 2]));
//! assert_eq!(outcome, RequestOutcome::Granted);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod enumerate;
mod error;
mod matrix;
mod request;
mod safety;
mod shared;
mod state;

pub use enumerate::SequenceEnumerator;
pub use error::{BankerError, BankerResult, RequestError};
pub use matrix::{Matrix, Units};
pub use request::{Grant, RequestOutcome, RequestProcessor};
pub use safety::{SafeSequence, SafetyChecker, SafetyResult};
pub use shared::SharedState;
pub use state::{ProcessId, ProcessStatus, ResourceState, Snapshot};

/// Default per-class capacity used when no configuration supplies one
pub const DEFAULT_TOTAL: [Units; 3] = [10, 5, 7];

/// Build a [`ResourceState`] from parsed `Max` and `Allocation` rows and the
/// per-class `Total` vector.
pub fn load_state<R: AsRef<[Units]>>(
    max: &[R],
    allocation: &[R],
    total: Vec<Units>,
) -> BankerResult<ResourceState> {
    ResourceState::from_rows(max, allocation, total)
}

/// Run the greedy safety check on `state` without mutating it.
pub fn check_safety(state: &ResourceState) -> SafetyResult {
    SafetyChecker::check(state)
}

/// Enumerate every safe completion order reachable from `state`.
pub fn enumerate_safe_sequences(state: &ResourceState) -> Vec<SafeSequence> {
    SequenceEnumerator::new(state).run()
}

/// Submit a request from process `pid` for `request` units of each class.
pub fn submit_request(
    state: &mut ResourceState,
    pid: usize,
    request: &[Units],
) -> Result<Grant, RequestError> {
    RequestProcessor::submit(state, pid, request)
}

/// Read-only copy of the state for display.
pub fn snapshot(state: &ResourceState) -> Snapshot {
    state.snapshot()
}
