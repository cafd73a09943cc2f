//! Request/grant/rollback protocol
//!
//! A request moves through `Received -> Validated -> {Granted, Rejected}`
//! and, when it exhausts the process's need, on to `Completed`. The state a
//! caller observes afterwards is either the fully committed grant or exactly
//! the state from before the request.

use crate::error::RequestError;
use crate::matrix::{self, Units};
use crate::safety::{SafeSequence, SafetyChecker};
use crate::state::{ProcessId, ResourceState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// A committed request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Grant {
    /// Resources transferred; the process still has outstanding need
    Granted {
        /// Witness order proving the new state safe
        sequence: SafeSequence,
    },
    /// Resources transferred, need reached zero and the process released
    /// everything it held
    Completed {
        /// Witness order proving the new state safe
        sequence: SafeSequence,
        /// Allocation row returned to Available
        released: Vec<Units>,
    },
}

impl Grant {
    /// Witness sequence behind the grant
    pub fn sequence(&self) -> &SafeSequence {
        match self {
            Grant::Granted { sequence } | Grant::Completed { sequence, .. } => sequence,
        }
    }
}

/// Flat classification of what a request came to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// Granted; the state stays safe
    Granted,
    /// Granted and the process completed
    Completed,
    /// Would have left the state unsafe; rolled back
    RejectedUnsafe,
    /// No such process
    RejectedInvalidId,
    /// More than the process's remaining need
    RejectedExceedsNeed,
    /// More than currently available
    RejectedExceedsAvailable,
    /// Request vector of the wrong length
    RejectedMalformed,
}

impl RequestOutcome {
    /// True for `Granted` and `Completed`
    pub fn is_granted(&self) -> bool {
        matches!(self, RequestOutcome::Granted | RequestOutcome::Completed)
    }
}

impl From<&Grant> for RequestOutcome {
    fn from(grant: &Grant) -> Self {
        match grant {
            Grant::Granted { .. } => RequestOutcome::Granted,
            Grant::Completed { .. } => RequestOutcome::Completed,
        }
    }
}

impl From<&RequestError> for RequestOutcome {
    fn from(err: &RequestError) -> Self {
        match err {
            RequestError::InvalidProcessId { .. } => RequestOutcome::RejectedInvalidId,
            RequestError::ExceedsMaxDemand { .. } => RequestOutcome::RejectedExceedsNeed,
            RequestError::InsufficientResources { .. } => {
                RequestOutcome::RejectedExceedsAvailable
            }
            RequestError::Unsafe(_) => RequestOutcome::RejectedUnsafe,
            RequestError::DimensionMismatch { .. } | RequestError::State(_) => {
                RequestOutcome::RejectedMalformed
            }
        }
    }
}

impl From<&Result<Grant, RequestError>> for RequestOutcome {
    fn from(result: &Result<Grant, RequestError>) -> Self {
        match result {
            Ok(grant) => grant.into(),
            Err(err) => err.into(),
        }
    }
}

/// Applies requests to a [`ResourceState`] one at a time
pub struct RequestProcessor;

impl RequestProcessor {
    /// Check a request against the current state without touching it
    ///
    /// Checks run in order: process id, vector length, need, available.
    pub fn validate(
        state: &ResourceState,
        pid: usize,
        request: &[Units],
    ) -> Result<ProcessId, RequestError> {
        if pid >= state.process_count() {
            return Err(RequestError::InvalidProcessId {
                pid,
                process_count: state.process_count(),
            });
        }
        let pid = ProcessId::new(pid);

        if request.len() != state.resource_count() {
            return Err(RequestError::DimensionMismatch {
                expected: state.resource_count(),
                got: request.len(),
            });
        }

        let need = state.need().row(pid.index());
        if let Some(j) = matrix::first_exceeding(request, need) {
            return Err(RequestError::ExceedsMaxDemand {
                pid,
                resource: j,
                requested: request[j],
                need: need[j],
            });
        }

        let available = state.available();
        if let Some(j) = matrix::first_exceeding(request, available) {
            return Err(RequestError::InsufficientResources {
                pid,
                resource: j,
                requested: request[j],
                available: available[j],
            });
        }

        Ok(pid)
    }

    /// Validate, tentatively apply, safety-check, then commit or roll back
    pub fn submit(
        state: &mut ResourceState,
        pid: usize,
        request: &[Units],
    ) -> Result<Grant, RequestError> {
        let pid = match Self::validate(state, pid, request) {
            Ok(pid) => pid,
            Err(e) => {
                debug!(pid, ?request, error = %e, "request rejected");
                return Err(e);
            }
        };

        state.apply_request(pid, request)?;

        let check = SafetyChecker::check(state);
        if !check.safe {
            state.undo_request(pid, request)?;
            warn!(%pid, ?request, "request would leave system unsafe, rolled back");
            return Err(RequestError::Unsafe(pid));
        }

        let grant = if matrix::is_zero(state.need().row(pid.index())) && !state.is_completed(pid)
        {
            let released = state.complete(pid);
            info!(%pid, ?released, "process completed and released its resources");
            Grant::Completed {
                sequence: check.sequence,
                released,
            }
        } else {
            info!(%pid, ?request, sequence = %check.sequence, "request granted");
            Grant::Granted {
                sequence: check.sequence,
            }
        };

        debug_assert!(state.check_invariants().is_ok());
        Ok(grant)
    }
}
