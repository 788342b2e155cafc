//! Communication balance (CB) and its bounded variant (CBv2).
//!
//! Both compare the busiest row total against the average row total. They
//! are computed independently from the row totals `T`; neither is derived
//! from the other.

use crate::matrix::CommunicationMatrix;

/// Percentage by which the busiest process exceeds the average load.
///
/// `CB = (n * max(T) / sum(T) - 1) * 100`. Zero when all row totals are
/// equal, unbounded above.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn communication_balance(matrix: &CommunicationMatrix) -> f64 {
    let n = matrix.dim() as f64;
    let (max, sum) = max_and_sum(&matrix.row_totals());
    (max / sum * n - 1.0) * 100.0
}

/// Load imbalance bounded in `[0, 1)`.
///
/// `CBv2 = 1 - sum(T) / (n * max(T))`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn communication_balance_v2(matrix: &CommunicationMatrix) -> f64 {
    let n = matrix.dim() as f64;
    let (max, sum) = max_and_sum(&matrix.row_totals());
    1.0 - sum / max / n
}

fn max_and_sum(totals: &[f64]) -> (f64, f64) {
    let max = totals.iter().copied().fold(0.0_f64, f64::max);
    let sum = totals.iter().sum();
    (max, sum)
}
