//! Communication amount (CA).

use crate::matrix::CommunicationMatrix;

/// Average cost per matrix cell: `CA = sum(C) / n^2`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn communication_amount(matrix: &CommunicationMatrix) -> f64 {
    let n = matrix.dim() as f64;
    matrix.total() / (n * n)
}
