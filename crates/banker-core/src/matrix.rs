//! Fixed-shape unit matrices and element-wise vector helpers

use crate::error::{BankerError, BankerResult};

/// Count of units of one resource class
pub type Units = u32;

/// Row-major `rows x cols` matrix of unit counts
///
/// The shape is fixed at construction; rows are exposed as slices of exactly
/// `cols` entries so callers cannot grow or shrink them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Units>,
}

impl Matrix {
    /// Create a zero-filled matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Build a matrix from nested rows
    ///
    /// The first row fixes the column count. Empty input, an empty first row,
    /// or any row of a different length is a `DimensionMismatch`.
    pub fn from_rows<R: AsRef<[Units]>>(rows: &[R]) -> BankerResult<Self> {
        let first = rows
            .first()
            .ok_or_else(|| BankerError::DimensionMismatch("matrix has no rows".into()))?;
        let cols = first.as_ref().len();
        if cols == 0 {
            return Err(BankerError::DimensionMismatch(
                "matrix has no columns".into(),
            ));
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(BankerError::DimensionMismatch(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Borrow row `i`
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> &[Units] {
        let start = i * self.cols;
        &self.data[start..start + self.cols]
    }

    pub(crate) fn row_mut(&mut self, i: usize) -> &mut [Units] {
        let start = i * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Value at row `i`, column `j`
    pub fn get(&self, i: usize, j: usize) -> Option<Units> {
        if i < self.rows && j < self.cols {
            Some(self.data[i * self.cols + j])
        } else {
            None
        }
    }

    /// Iterate over rows in order
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Units]> {
        self.data.chunks_exact(self.cols.max(1))
    }

    /// Sum of column `j`, widened so it cannot overflow
    pub fn column_sum(&self, j: usize) -> u64 {
        self.iter_rows().map(|row| u64::from(row[j])).sum()
    }

    /// Copy into nested rows
    pub fn to_rows(&self) -> Vec<Vec<Units>> {
        self.iter_rows().map(<[Units]>::to_vec).collect()
    }
}

/// Element-wise `lhs <= rhs`
pub fn le(lhs: &[Units], rhs: &[Units]) -> bool {
    first_exceeding(lhs, rhs).is_none()
}

/// Index of the first entry where `lhs` exceeds `rhs`
pub fn first_exceeding(lhs: &[Units], rhs: &[Units]) -> Option<usize> {
    lhs.iter().zip(rhs).position(|(l, r)| l > r)
}

/// `dst += src`, element-wise
pub fn add_assign(dst: &mut [Units], src: &[Units]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d += s;
    }
}

/// `dst -= src`, element-wise
///
/// Callers must have established `src <= dst`.
pub fn sub_assign(dst: &mut [Units], src: &[Units]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d -= s;
    }
}

/// `lhs - rhs` element-wise, or `None` if any entry would go negative
pub fn checked_sub(lhs: &[Units], rhs: &[Units]) -> Option<Vec<Units>> {
    lhs.iter().zip(rhs).map(|(l, r)| l.checked_sub(*r)).collect()
}

/// `lhs + rhs` element-wise, or `None` on overflow
pub fn checked_add(lhs: &[Units], rhs: &[Units]) -> Option<Vec<Units>> {
    lhs.iter().zip(rhs).map(|(l, r)| l.checked_add(*r)).collect()
}

/// True if every entry is zero
pub fn is_zero(v: &[Units]) -> bool {
    v.iter().all(|&x| x == 0)
}
