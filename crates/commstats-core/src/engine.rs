//! Statistics engine: a validated matrix plus the metric queries over it.
//!
//! # Usage
//!
//! ```rust
//! use commstats_core::engine::StatisticsEngine;
//!
//! let engine = StatisticsEngine::from_rows(vec![
//!     vec![0.0, 1.0],
//!     vec![1.0, 0.0],
//! ])?;
//!
//! assert_eq!(engine.neighbor_communication_fraction()?, 0.0);
//! assert_eq!(engine.split_fraction(2)?, 0.0);
//! # Ok::<(), commstats_core::error::StatsError>(())
//! ```
//!
//! Every query recomputes its result from the stored matrix. The engine
//! holds no other state, so it can be shared across threads freely.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::matrix::CommunicationMatrix;
use crate::metrics::{self, DEFAULT_SPLIT_SIZE};

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

/// Identifies one metric query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Heterogeneity,
    HeterogeneityV2,
    Amount,
    Balance,
    BalanceV2,
    Centrality,
    NeighborFraction,
    /// Split fraction with block size `k`.
    SplitFraction(i64),
}

impl Metric {
    /// Short acronym, e.g. `CH` or `SP(4)`.
    #[must_use]
    pub fn acronym(self) -> String {
        match self {
            Self::Heterogeneity => "CH".to_string(),
            Self::HeterogeneityV2 => "CHv2".to_string(),
            Self::Amount => "CA".to_string(),
            Self::Balance => "CB".to_string(),
            Self::BalanceV2 => "CBv2".to_string(),
            Self::Centrality => "CC".to_string(),
            Self::NeighborFraction => "NBC".to_string(),
            Self::SplitFraction(k) => format!("SP({k})"),
        }
    }

    /// Descriptive label used in reports.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Heterogeneity => "Communication heterogeneity (CH)".to_string(),
            Self::HeterogeneityV2 => "Communication heterogeneity v2 (CHv2)".to_string(),
            Self::Amount => "Communication amount (CA)".to_string(),
            Self::Balance => "Communication balance (CB)".to_string(),
            Self::BalanceV2 => "Communication balance v2 (CBv2)".to_string(),
            Self::Centrality => "Communication centrality (CC)".to_string(),
            Self::NeighborFraction => "Neighbor communication fraction (NBC)".to_string(),
            Self::SplitFraction(k) => format!("Split fraction SP(k), k={k}"),
        }
    }

    /// All metrics in report order, with one split fraction per block size.
    #[must_use]
    pub fn standard_set(split_sizes: &[i64]) -> Vec<Self> {
        let mut set = vec![
            Self::Heterogeneity,
            Self::HeterogeneityV2,
            Self::Amount,
            Self::Balance,
            Self::BalanceV2,
            Self::Centrality,
            Self::NeighborFraction,
        ];
        set.extend(split_sizes.iter().map(|&k| Self::SplitFraction(k)));
        set
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.acronym())
    }
}

// ---------------------------------------------------------------------------
// StatisticsEngine
// ---------------------------------------------------------------------------

/// Owns a [`CommunicationMatrix`] and answers metric queries against it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsEngine {
    matrix: CommunicationMatrix,
}

impl StatisticsEngine {
    /// Wrap an already validated matrix.
    #[must_use]
    pub fn new(matrix: CommunicationMatrix) -> Self {
        debug!(dim = matrix.dim(), "statistics engine ready");
        Self { matrix }
    }

    /// Validate `rows` and wrap the result.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found by
    /// [`validate`](crate::matrix::validate).
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        CommunicationMatrix::from_rows(rows).map(Self::new)
    }

    #[must_use]
    pub const fn matrix(&self) -> &CommunicationMatrix {
        &self.matrix
    }

    #[must_use]
    pub const fn dim(&self) -> usize {
        self.matrix.dim()
    }

    /// See [`metrics::communication_amount`].
    #[must_use]
    pub fn communication_amount(&self) -> f64 {
        metrics::communication_amount(&self.matrix)
    }

    /// See [`metrics::communication_heterogeneity`].
    #[must_use]
    pub fn communication_heterogeneity(&self) -> f64 {
        metrics::communication_heterogeneity(&self.matrix)
    }

    /// See [`metrics::communication_heterogeneity_v2`].
    #[must_use]
    pub fn communication_heterogeneity_v2(&self) -> f64 {
        metrics::communication_heterogeneity_v2(&self.matrix)
    }

    /// See [`metrics::communication_balance`].
    #[must_use]
    pub fn communication_balance(&self) -> f64 {
        metrics::communication_balance(&self.matrix)
    }

    /// See [`metrics::communication_balance_v2`].
    #[must_use]
    pub fn communication_balance_v2(&self) -> f64 {
        metrics::communication_balance_v2(&self.matrix)
    }

    /// See [`metrics::communication_centrality`].
    #[must_use]
    pub fn communication_centrality(&self) -> f64 {
        metrics::communication_centrality(&self.matrix)
    }

    /// See [`metrics::neighbor_communication_fraction`].
    ///
    /// # Errors
    ///
    /// Fails for matrices smaller than 2x2.
    pub fn neighbor_communication_fraction(&self) -> Result<f64> {
        metrics::neighbor_communication_fraction(&self.matrix)
    }

    /// See [`metrics::split_fraction`].
    ///
    /// # Errors
    ///
    /// Fails if `k <= 0`. The engine stays usable afterwards.
    pub fn split_fraction(&self, k: i64) -> Result<f64> {
        metrics::split_fraction(&self.matrix, k)
    }

    /// Split fraction with [`DEFAULT_SPLIT_SIZE`].
    ///
    /// # Errors
    ///
    /// Only fails if the matrix sums to zero, which validation rules out.
    pub fn default_split_fraction(&self) -> Result<f64> {
        self.split_fraction(DEFAULT_SPLIT_SIZE)
    }

    /// Evaluate the query named by `metric`.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying query.
    pub fn evaluate(&self, metric: Metric) -> Result<f64> {
        match metric {
            Metric::Heterogeneity => Ok(self.communication_heterogeneity()),
            Metric::HeterogeneityV2 => Ok(self.communication_heterogeneity_v2()),
            Metric::Amount => Ok(self.communication_amount()),
            Metric::Balance => Ok(self.communication_balance()),
            Metric::BalanceV2 => Ok(self.communication_balance_v2()),
            Metric::Centrality => Ok(self.communication_centrality()),
            Metric::NeighborFraction => self.neighbor_communication_fraction(),
            Metric::SplitFraction(k) => self.split_fraction(k),
        }
    }
}

impl From<CommunicationMatrix> for StatisticsEngine {
    fn from(matrix: CommunicationMatrix) -> Self {
        Self::new(matrix)
    }
}

/// Acronym shorthands. Each one only forwards to the full-name query.
impl StatisticsEngine {
    #[must_use]
    pub fn ca(&self) -> f64 {
        self.communication_amount()
    }

    #[must_use]
    pub fn ch(&self) -> f64 {
        self.communication_heterogeneity()
    }

    #[must_use]
    pub fn ch_v2(&self) -> f64 {
        self.communication_heterogeneity_v2()
    }

    #[must_use]
    pub fn cb(&self) -> f64 {
        self.communication_balance()
    }

    #[must_use]
    pub fn cb_v2(&self) -> f64 {
        self.communication_balance_v2()
    }

    #[must_use]
    pub fn cc(&self) -> f64 {
        self.communication_centrality()
    }

    /// # Errors
    ///
    /// See [`StatisticsEngine::neighbor_communication_fraction`].
    pub fn nbc(&self) -> Result<f64> {
        self.neighbor_communication_fraction()
    }

    /// # Errors
    ///
    /// See [`StatisticsEngine::split_fraction`].
    pub fn sp(&self, k: i64) -> Result<f64> {
        self.split_fraction(k)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, StatsError};

    fn engine(rows: Vec<Vec<f64>>) -> StatisticsEngine {
        StatisticsEngine::from_rows(rows).expect("valid test matrix")
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StatisticsEngine>();
    }

    #[test]
    fn from_rows_propagates_validation_error() {
        let err = StatisticsEngine::from_rows(vec![vec![1.0, 2.0]])
            .expect_err("1x2 is not square");
        assert_eq!(err, StatsError::NotSquare { rows: 1, cols: 2 });
    }

    #[test]
    fn aliases_match_full_names() {
        let e = engine(vec![
            vec![1.0, 4.0, 0.0],
            vec![2.0, 0.0, 3.0],
            vec![0.5, 0.5, 6.0],
        ]);
        assert_eq!(e.ca().to_bits(), e.communication_amount().to_bits());
        assert_eq!(e.ch().to_bits(), e.communication_heterogeneity().to_bits());
        assert_eq!(e.ch_v2().to_bits(), e.communication_heterogeneity_v2().to_bits());
        assert_eq!(e.cb().to_bits(), e.communication_balance().to_bits());
        assert_eq!(e.cb_v2().to_bits(), e.communication_balance_v2().to_bits());
        assert_eq!(e.cc().to_bits(), e.communication_centrality().to_bits());
        assert_eq!(e.nbc(), e.neighbor_communication_fraction());
        assert_eq!(e.sp(2), e.split_fraction(2));
    }

    #[test]
    fn evaluate_dispatches_every_metric() {
        let e = engine(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        for metric in Metric::standard_set(&[1, 2]) {
            let via_dispatch = e.evaluate(metric).expect("valid metric");
            let direct = match metric {
                Metric::Heterogeneity => e.ch(),
                Metric::HeterogeneityV2 => e.ch_v2(),
                Metric::Amount => e.ca(),
                Metric::Balance => e.cb(),
                Metric::BalanceV2 => e.cb_v2(),
                Metric::Centrality => e.cc(),
                Metric::NeighborFraction => e.nbc().expect("n = 2"),
                Metric::SplitFraction(k) => e.sp(k).expect("k > 0"),
            };
            assert_eq!(via_dispatch.to_bits(), direct.to_bits(), "{metric}");
        }
    }

    #[test]
    fn bad_k_does_not_poison_the_engine() {
        let e = engine(vec![vec![1.0; 4]; 4]);
        let err = e.split_fraction(0).expect_err("k = 0");
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert!((e.split_fraction(2).expect("k = 2") - 0.5).abs() < 1e-12);
        assert!((e.communication_amount() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn default_split_uses_block_size_two() {
        let e = engine(vec![vec![1.0; 4]; 4]);
        assert_eq!(e.default_split_fraction(), e.split_fraction(2));
    }

    #[test]
    fn standard_set_order_and_labels() {
        let set = Metric::standard_set(&[2, 4, 8]);
        let acronyms: Vec<String> = set.iter().map(|m| m.acronym()).collect();
        assert_eq!(
            acronyms,
            vec!["CH", "CHv2", "CA", "CB", "CBv2", "CC", "NBC", "SP(2)", "SP(4)", "SP(8)"]
        );
        assert_eq!(
            Metric::SplitFraction(4).label(),
            "Split fraction SP(k), k=4"
        );
    }

    #[test]
    fn metric_serializes_snake_case() {
        let json = serde_json::to_string(&Metric::NeighborFraction).expect("serialize");
        assert_eq!(json, "\"neighbor_fraction\"");
        let json = serde_json::to_string(&Metric::SplitFraction(4)).expect("serialize");
        assert_eq!(json, "{\"split_fraction\":4}");
    }

    #[test]
    fn metric_parses_from_its_serialized_form() {
        for metric in Metric::standard_set(&[2, 16]) {
            let json = serde_json::to_string(&metric).expect("serialize");
            let back: Metric = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, metric);
        }
        let parsed: Metric = serde_json::from_str("\"centrality\"").expect("unit variant");
        assert_eq!(parsed, Metric::Centrality);
    }
}
