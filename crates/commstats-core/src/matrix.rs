//! Validated communication cost matrix.
//!
//! # Overview
//!
//! A [`CommunicationMatrix`] is an `n x n` grid of non-negative costs where
//! entry `(i, j)` is the volume sent from process `i` to process `j`. The
//! only way to obtain one is through [`validate`] (or the constructors that
//! delegate to it), so every metric can rely on these invariants:
//!
//! - the matrix has at least one row and is square;
//! - no entry is NaN, infinite or negative;
//! - every row sum and the grand total are finite;
//! - every row has a strictly positive sum.
//!
//! Checks run in a fixed order and the first failure wins: emptiness,
//! NaN, negative values, infinities, overflowing sums, all-zero rows, and
//! finally the shape.

use tracing::debug;

use crate::error::{Result, StatsError};

// ---------------------------------------------------------------------------
// CommunicationMatrix
// ---------------------------------------------------------------------------

/// Immutable, validated square cost matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunicationMatrix {
    dim: usize,
    data: Vec<f64>,
}

impl CommunicationMatrix {
    /// Validate and take ownership of a list of rows.
    ///
    /// # Errors
    ///
    /// See [`validate`].
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        validate(&rows)
    }

    /// Number of processes (rows == columns).
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Cost from process `i` to process `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not below [`dim`](Self::dim).
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(j < self.dim, "column {j} out of range for dimension {}", self.dim);
        self.data[i * self.dim + j]
    }

    /// Row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not below [`dim`](Self::dim).
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterate over the rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.dim)
    }

    /// Sum of every entry.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Largest entry. Strictly positive for a validated matrix.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0_f64, f64::max)
    }

    /// Per-row sums (each process's outgoing communication).
    #[must_use]
    pub fn row_totals(&self) -> Vec<f64> {
        self.rows().map(|row| row.iter().sum()).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for CommunicationMatrix {
    type Error = StatsError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        validate(&rows)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a candidate matrix and build a [`CommunicationMatrix`] from it.
///
/// # Errors
///
/// - [`StatsError::Empty`] if there are no rows.
/// - [`StatsError::NotANumber`] for the first NaN entry.
/// - [`StatsError::Negative`] for the first negative entry.
/// - [`StatsError::NotFinite`] for the first `+inf` entry.
/// - [`StatsError::RowOverflow`] / [`StatsError::TotalOverflow`] if a row sum
///   or the grand total is not representable.
/// - [`StatsError::DegenerateRow`] for the first row summing to zero.
/// - [`StatsError::Ragged`] / [`StatsError::NotSquare`] if the grid is not square.
pub fn validate<R: AsRef<[f64]>>(rows: &[R]) -> Result<CommunicationMatrix> {
    check(rows).inspect_err(|err| debug!(code = err.code(), "matrix rejected: {err}"))?;

    let dim = rows.len();
    let mut data = Vec::with_capacity(dim * dim);
    for row in rows {
        data.extend_from_slice(row.as_ref());
    }

    debug!(dim, "matrix accepted");
    Ok(CommunicationMatrix { dim, data })
}

fn check<R: AsRef<[f64]>>(rows: &[R]) -> Result<()> {
    if rows.is_empty() {
        return Err(StatsError::Empty);
    }

    if let Some((row, col, _)) = find_cell(rows, |v| v.is_nan()) {
        return Err(StatsError::NotANumber { row, col });
    }
    if let Some((row, col, value)) = find_cell(rows, |v| v < 0.0) {
        return Err(StatsError::Negative { row, col, value });
    }
    if let Some((row, col, _)) = find_cell(rows, f64::is_infinite) {
        return Err(StatsError::NotFinite { row, col });
    }

    if let Some(row) = rows
        .iter()
        .position(|r| !r.as_ref().iter().sum::<f64>().is_finite())
    {
        return Err(StatsError::RowOverflow { row });
    }
    // Same summation order as `CommunicationMatrix::total`.
    let total: f64 = rows.iter().flat_map(|r| r.as_ref().iter()).sum();
    if !total.is_finite() {
        return Err(StatsError::TotalOverflow);
    }

    // Non-negative entries only sum to zero when every one of them is zero.
    if let Some(row) = rows
        .iter()
        .position(|r| r.as_ref().iter().sum::<f64>() == 0.0)
    {
        return Err(StatsError::DegenerateRow { row });
    }

    let expected = rows[0].as_ref().len();
    if let Some((row, r)) = rows
        .iter()
        .enumerate()
        .find(|(_, r)| r.as_ref().len() != expected)
    {
        return Err(StatsError::Ragged {
            row,
            expected,
            found: r.as_ref().len(),
        });
    }
    if expected != rows.len() {
        return Err(StatsError::NotSquare {
            rows: rows.len(),
            cols: expected,
        });
    }

    Ok(())
}

/// First cell (in row-major order) whose value satisfies `pred`.
fn find_cell<R: AsRef<[f64]>>(
    rows: &[R],
    pred: impl Fn(f64) -> bool,
) -> Option<(usize, usize, f64)> {
    rows.iter().enumerate().find_map(|(i, row)| {
        row.as_ref()
            .iter()
            .position(|&v| pred(v))
            .map(|j| (i, j, row.as_ref()[j]))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
