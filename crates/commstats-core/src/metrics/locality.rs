//! Locality metrics: centrality (CC), neighbor fraction (NBC) and split
//! fraction (SP(k)).
//!
//! All three treat the process index as a 1-D topology and measure how
//! much of the traffic stays close to the diagonal. Columns outside
//! `[0, n)` are treated as zero-cost padding.

use tracing::instrument;

use crate::error::{Result, StatsError};
use crate::matrix::CommunicationMatrix;

/// Block size used by [`split_fraction`] when the caller has no preference.
pub const DEFAULT_SPLIT_SIZE: i64 = 2;

// ---------------------------------------------------------------------------
// Centrality
// ---------------------------------------------------------------------------

/// Average clipped window width needed to hold half of each row's cost.
///
/// For each row `i`, find the smallest radius `r` such that
/// `sum(C(i, i-r..=i+r)) >= T(i) / 2`, then accumulate
/// `min(i + r, n - 1) - max(i - r, 0)`. The result is that total divided
/// by `n^2`, so it lies in `[0, 1)`. Smaller values mean more local
/// communication.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(matrix), fields(dim = matrix.dim()))]
pub fn communication_centrality(matrix: &CommunicationMatrix) -> f64 {
    let n = matrix.dim();
    let mut width_total = 0_usize;

    for (i, row) in matrix.rows().enumerate() {
        let radius = half_cost_radius(row, i);
        width_total += (i + radius).min(n - 1) - i.saturating_sub(radius);
    }

    width_total as f64 / (n * n) as f64
}

/// Smallest radius around `center` whose window covers half the row's cost.
fn half_cost_radius(row: &[f64], center: usize) -> usize {
    let n = row.len();
    let half = row.iter().sum::<f64>() / 2.0;

    let mut radius = 0;
    let mut acc = row[center];
    // Once radius reaches n the window spans the whole row.
    while acc < half && radius < n {
        radius += 1;
        if radius <= center {
            acc += row[center - radius];
        }
        if center + radius < n {
            acc += row[center + radius];
        }
    }
    radius
}

// ---------------------------------------------------------------------------
// Neighbor fraction
// ---------------------------------------------------------------------------

/// Share of traffic that does *not* go to an adjacent index.
///
/// `NBC = 1 - sum_i(C(i, i-1) + C(i, i+1)) / sum(C)`. Zero when all traffic
/// is between direct neighbors.
///
/// # Errors
///
/// - [`StatsError::TooSmall`] if `n < 2` (no neighbor pairs exist).
/// - [`StatsError::DivisionByZero`] if the matrix sums to zero.
pub fn neighbor_communication_fraction(matrix: &CommunicationMatrix) -> Result<f64> {
    let n = matrix.dim();
    if n < 2 {
        return Err(StatsError::TooSmall {
            metric: "neighbor_communication_fraction",
            dim: n,
            min: 2,
        });
    }
    let total = nonzero(matrix.total(), "sum(C)")?;

    let mut neighbor = matrix.get(0, 1) + matrix.get(n - 1, n - 2);
    for i in 1..n - 1 {
        neighbor += matrix.get(i, i - 1) + matrix.get(i, i + 1);
    }

    Ok(1.0 - neighbor / total)
}

// ---------------------------------------------------------------------------
// Split fraction
// ---------------------------------------------------------------------------

/// Share of traffic that leaves the `k x k` diagonal blocks.
///
/// The index range is cut into `floor(n / k)` contiguous blocks of size
/// `k`; a trailing partial block is dropped, not padded. The result is
/// `1 - (sum of the diagonal block sub-matrices) / sum(C)`, which is `1.0`
/// when `k > n` and `0.0` when `k == n`.
///
/// # Errors
///
/// - [`StatsError::InvalidParameter`] if `k <= 0`.
/// - [`StatsError::DivisionByZero`] if the matrix sums to zero.
#[instrument(skip(matrix), fields(dim = matrix.dim()))]
pub fn split_fraction(matrix: &CommunicationMatrix, k: i64) -> Result<f64> {
    if k <= 0 {
        return Err(StatsError::InvalidParameter {
            name: "k",
            value: k,
            reason: "block size must be greater than zero",
        });
    }
    // A k beyond the address range is larger than any matrix.
    let block = usize::try_from(k).unwrap_or(usize::MAX);
    let total = nonzero(matrix.total(), "sum(C)")?;

    let blocks = matrix.dim() / block;
    let mut inside = 0.0;
    for s in 0..blocks {
        let span = s * block..(s + 1) * block;
        for i in span.clone() {
            inside += matrix.row(i)[span.clone()].iter().sum::<f64>();
        }
    }

    Ok(1.0 - inside / total)
}

const fn nonzero(value: f64, quantity: &'static str) -> Result<f64> {
    if value == 0.0 {
        Err(StatsError::DivisionByZero { quantity })
    } else {
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
