//! Communication heterogeneity (CH) and its unscaled variant (CHv2).
//!
//! Both normalize the matrix by its largest entry, take the population
//! variance of every row, and average those variances over the rows:
//!
//! ```text
//! M = scale * C / max(C)
//! CH = sum_i var(M(i)) / n
//! ```
//!
//! CH uses `scale = 100`, CHv2 uses `scale = 1`, so `CHv2 = CH / 10^4`.

use crate::matrix::CommunicationMatrix;

const PERCENT_SCALE: f64 = 100.0;

/// Heterogeneity on a 0..100 normalized scale.
#[must_use]
pub fn communication_heterogeneity(matrix: &CommunicationMatrix) -> f64 {
    mean_row_variance(matrix, PERCENT_SCALE)
}

/// Heterogeneity on a 0..1 normalized scale.
#[must_use]
pub fn communication_heterogeneity_v2(matrix: &CommunicationMatrix) -> f64 {
    mean_row_variance(matrix, 1.0)
}

#[allow(clippy::cast_precision_loss)]
fn mean_row_variance(matrix: &CommunicationMatrix, scale: f64) -> f64 {
    let n = matrix.dim() as f64;
    let max = matrix.max();

    let mut normalized = Vec::with_capacity(matrix.dim());
    let variance_sum: f64 = matrix
        .rows()
        .map(|row| {
            normalized.clear();
            normalized.extend(row.iter().map(|&c| scale * c / max));
            population_variance(&normalized)
        })
        .sum();

    variance_sum / n
}

/// Variance with divisor `len` (not `len - 1`).
#[allow(clippy::cast_precision_loss)]
fn population_variance(values: &[f64]) -> f64 {
    let len = values.len() as f64;
    let mean = values.iter().sum::<f64>() / len;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / len
}
