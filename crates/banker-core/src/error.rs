//! Error types for the banker core

use crate::matrix::Units;
use crate::state::ProcessId;
use thiserror::Error;

/// Errors raised while building or auditing a resource state
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BankerError {
    /// Input matrices or vectors disagree on shape
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A process already holds more than it declared it would ever need
    #[error("allocation exceeds max demand for {pid} on resource {resource}: {allocated} > {max}")]
    AllocationExceedsMax {
        /// Offending process
        pid: ProcessId,
        /// Resource class index
        resource: usize,
        /// Units allocated
        allocated: Units,
        /// Declared maximum
        max: Units,
    },

    /// Allocations in one resource class sum past its capacity
    #[error("resource {resource} over-committed: {allocated} allocated, capacity {total}")]
    OverCommitted {
        /// Resource class index
        resource: usize,
        /// Sum of allocations in the column
        allocated: u64,
        /// Fixed capacity of the class
        total: Units,
    },

    /// A derived value drifted from the arithmetic it is defined by
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for state construction and auditing
pub type BankerResult<T> = Result<T, BankerError>;

/// Recoverable reasons a request is turned down
///
/// The state is left exactly as it was before the request whenever one of
/// these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Process id outside `0..n`
    #[error("invalid process id {pid}: only {process_count} processes exist")]
    InvalidProcessId {
        /// Requested id
        pid: usize,
        /// Number of processes in the state
        process_count: usize,
    },

    /// Request vector length differs from the number of resource classes
    #[error("request has {got} entries, expected {expected}")]
    DimensionMismatch {
        /// Number of resource classes
        expected: usize,
        /// Length of the submitted vector
        got: usize,
    },

    /// Request exceeds the remaining need of the process
    #[error("{pid} request exceeds its maximum demand on resource {resource}: {requested} > need {need}")]
    ExceedsMaxDemand {
        /// Requesting process
        pid: ProcessId,
        /// First offending resource class
        resource: usize,
        /// Units requested
        requested: Units,
        /// Remaining need
        need: Units,
    },

    /// Request exceeds what is currently free
    #[error("{pid} request has not enough resources on resource {resource}: {requested} > available {available}")]
    InsufficientResources {
        /// Requesting process
        pid: ProcessId,
        /// First offending resource class
        resource: usize,
        /// Units requested
        requested: Units,
        /// Units available
        available: Units,
    },

    /// Granting would leave the system without any safe completion order
    #[error("granting the request to {0} would leave the system unsafe")]
    Unsafe(ProcessId),

    /// The state refused the transfer outright
    #[error("state error: {0}")]
    State(#[from] BankerError),
}
