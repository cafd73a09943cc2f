//! Resource-allocation state: demand, allocation, need and availability

use crate::error::{BankerError, BankerResult};
use crate::matrix::{self, Matrix, Units};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Process identifier, `0..n`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcessId(pub usize);

impl ProcessId {
    /// Create a new process ID
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the raw index
    pub fn index(&self) -> usize {
        self.0
    }

    /// Display label, e.g. `P3`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl From<usize> for ProcessId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

/// Lifecycle of a process
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    /// Still holding or requesting resources
    Active,
    /// Reached its maximum demand and released everything it held
    Completed,
}

/// Live resource state of the simulation
///
/// Built once from `Max`, `Allocation` and `Total`; `Need` and `Available`
/// are derived at construction and then adjusted in lockstep with every
/// allocation change. Mutation is reserved for the request processor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceState {
    max: Matrix,
    allocation: Matrix,
    need: Matrix,
    available: Vec<Units>,
    total: Vec<Units>,
    status: Vec<ProcessStatus>,
}

impl ResourceState {
    /// Build a state from validated matrices and the capacity vector
    pub fn new(max: Matrix, allocation: Matrix, total: Vec<Units>) -> BankerResult<Self> {
        if max.rows() != allocation.rows() || max.cols() != allocation.cols() {
            return Err(BankerError::DimensionMismatch(format!(
                "max is {}x{}, allocation is {}x{}",
                max.rows(),
                max.cols(),
                allocation.rows(),
                allocation.cols()
            )));
        }
        if total.len() != max.cols() {
            return Err(BankerError::DimensionMismatch(format!(
                "total has {} resource classes, matrices have {}",
                total.len(),
                max.cols()
            )));
        }

        let (n, m) = (max.rows(), max.cols());
        let mut need = Matrix::zeros(n, m);
        for i in 0..n {
            let row = matrix::checked_sub(max.row(i), allocation.row(i)).ok_or_else(|| {
                // checked_sub only fails where allocation exceeds max
                let j = matrix::first_exceeding(allocation.row(i), max.row(i)).unwrap_or(0);
                BankerError::AllocationExceedsMax {
                    pid: ProcessId(i),
                    resource: j,
                    allocated: allocation.row(i)[j],
                    max: max.row(i)[j],
                }
            })?;
            need.row_mut(i).copy_from_slice(&row);
        }

        let mut available = Vec::with_capacity(m);
        for (j, &cap) in total.iter().enumerate() {
            let allocated = allocation.column_sum(j);
            if allocated > u64::from(cap) {
                return Err(BankerError::OverCommitted {
                    resource: j,
                    allocated,
                    total: cap,
                });
            }
            // allocated <= cap, so the narrowing is lossless
            available.push(cap - allocated as Units);
        }

        debug!(processes = n, resources = m, ?available, "resource state loaded");

        Ok(Self {
            max,
            allocation,
            need,
            available,
            total,
            status: vec![ProcessStatus::Active; n],
        })
    }

    /// Build a state from nested rows
    pub fn from_rows<R: AsRef<[Units]>>(
        max: &[R],
        allocation: &[R],
        total: Vec<Units>,
    ) -> BankerResult<Self> {
        let max = Matrix::from_rows(max)?;
        let allocation = Matrix::from_rows(allocation)?;
        Self::new(max, allocation, total)
    }

    /// Number of processes (`n`)
    pub fn process_count(&self) -> usize {
        self.max.rows()
    }

    /// Number of resource classes (`m`)
    pub fn resource_count(&self) -> usize {
        self.max.cols()
    }

    /// Iterate process ids in ascending order
    pub fn processes(&self) -> impl Iterator<Item = ProcessId> {
        (0..self.process_count()).map(ProcessId)
    }

    /// Check whether `pid` names a process in this state
    pub fn contains(&self, pid: ProcessId) -> bool {
        pid.0 < self.process_count()
    }

    /// Maximum demand matrix
    pub fn max(&self) -> &Matrix {
        &self.max
    }

    /// Allocation matrix
    pub fn allocation(&self) -> &Matrix {
        &self.allocation
    }

    /// Need matrix
    pub fn need(&self) -> &Matrix {
        &self.need
    }

    /// Available vector
    pub fn available(&self) -> &[Units] {
        &self.available
    }

    /// Total capacity vector
    pub fn total(&self) -> &[Units] {
        &self.total
    }

    /// Lifecycle status of `pid`
    pub fn status(&self, pid: ProcessId) -> Option<ProcessStatus> {
        self.status.get(pid.0).copied()
    }

    /// Check if `pid` has completed and released its resources
    pub fn is_completed(&self, pid: ProcessId) -> bool {
        self.status(pid) == Some(ProcessStatus::Completed)
    }

    /// Move `request` from Available into `pid`'s allocation
    ///
    /// Every updated row is computed before any is written, so a request
    /// that would drive a value negative leaves the state untouched.
    pub(crate) fn apply_request(&mut self, pid: ProcessId, request: &[Units]) -> BankerResult<()> {
        let i = pid.0;
        let available = matrix::checked_sub(&self.available, request);
        let need = matrix::checked_sub(self.need.row(i), request);
        let allocation = matrix::checked_add(self.allocation.row(i), request);

        match (available, need, allocation) {
            (Some(available), Some(need), Some(allocation)) => {
                self.available = available;
                self.need.row_mut(i).copy_from_slice(&need);
                self.allocation.row_mut(i).copy_from_slice(&allocation);
                Ok(())
            }
            _ => Err(BankerError::InvariantViolation(format!(
                "request {:?} from {} cannot be applied",
                request, pid
            ))),
        }
    }

    /// Exact inverse of [`apply_request`](Self::apply_request)
    pub(crate) fn undo_request(&mut self, pid: ProcessId, request: &[Units]) -> BankerResult<()> {
        let i = pid.0;
        let available = matrix::checked_add(&self.available, request);
        let need = matrix::checked_add(self.need.row(i), request);
        let allocation = matrix::checked_sub(self.allocation.row(i), request);

        match (available, need, allocation) {
            (Some(available), Some(need), Some(allocation)) => {
                self.available = available;
                self.need.row_mut(i).copy_from_slice(&need);
                self.allocation.row_mut(i).copy_from_slice(&allocation);
                Ok(())
            }
            _ => Err(BankerError::InvariantViolation(format!(
                "request {:?} from {} cannot be undone",
                request, pid
            ))),
        }
    }

    /// Release everything `pid` holds and mark it completed
    ///
    /// Returns the released allocation row. Need stays at zero: a completed
    /// process has no outstanding demand.
    pub(crate) fn complete(&mut self, pid: ProcessId) -> Vec<Units> {
        let i = pid.0;
        let released = self.allocation.row(i).to_vec();
        matrix::add_assign(&mut self.available, &released);
        self.allocation.row_mut(i).fill(0);
        self.need.row_mut(i).fill(0);
        self.status[i] = ProcessStatus::Completed;
        released
    }

    /// Verify the arithmetic linking Max, Allocation, Need, Available, Total
    ///
    /// Active processes satisfy `Need = Max - Alloc` and `Alloc <= Max`;
    /// completed processes hold nothing and need nothing. Every class
    /// satisfies `Available = Total - sum(Alloc)`.
    ///
    /// Completed rows are exempt from `Need = Max - Alloc`: they are checked
    /// as `Need = Alloc = 0` instead.
    pub fn check_invariants(&self) -> BankerResult<()> {
        for pid in self.processes() {
            let i = pid.0;
            let (max, alloc, need) = (self.max.row(i), self.allocation.row(i), self.need.row(i));
            match self.status[i] {
                ProcessStatus::Active => {
                    for j in 0..self.resource_count() {
                        if alloc[j] > max[j] || need[j] != max[j] - alloc[j] {
                            return Err(BankerError::InvariantViolation(format!(
                                "{} resource {}: max {}, allocation {}, need {}",
                                pid, j, max[j], alloc[j], need[j]
                            )));
                        }
                    }
                }
                ProcessStatus::Completed => {
                    if !matrix::is_zero(alloc) || !matrix::is_zero(need) {
                        return Err(BankerError::InvariantViolation(format!(
                            "completed {} still holds {:?} and needs {:?}",
                            pid, alloc, need
                        )));
                    }
                }
            }
        }

        for (j, &cap) in self.total.iter().enumerate() {
            let allocated = self.allocation.column_sum(j);
            if allocated + u64::from(self.available[j]) != u64::from(cap) {
                return Err(BankerError::InvariantViolation(format!(
                    "resource {}: available {} + allocated {} != total {}",
                    j, self.available[j], allocated, cap
                )));
            }
        }

        Ok(())
    }

    /// Owned, serializable copy of the state for display
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            processes: self.processes().map(|p| p.label()).collect(),
            status: self.status.clone(),
            max: self.max.to_rows(),
            allocation: self.allocation.to_rows(),
            need: self.need.to_rows(),
            available: self.available.clone(),
            total: self.total.clone(),
        }
    }
}

/// Read-only view of a [`ResourceState`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Process labels in id order
    pub processes: Vec<String>,
    /// Lifecycle status per process
    pub status: Vec<ProcessStatus>,
    /// Maximum demand rows
    pub max: Vec<Vec<Units>>,
    /// Allocation rows
    pub allocation: Vec<Vec<Units>>,
    /// Need rows
    pub need: Vec<Vec<Units>>,
    /// Available vector
    pub available: Vec<Units>,
    /// Total capacity vector
    pub total: Vec<Units>,
}
