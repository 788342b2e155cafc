//! Communication pattern metrics over a validated [`CommunicationMatrix`].
//!
//! # Overview
//!
//! Each metric condenses the whole matrix into a single `f64`. They are
//! grouped by the question they answer:
//!
//! - **Amount** (`amount`): how much communication is there per cell?
//! - **Heterogeneity** (`heterogeneity`): how unevenly does each process
//!   spread its traffic over its partners?
//! - **Balance** (`balance`): how far does the busiest process exceed the
//!   average load?
//! - **Locality** (`locality`): how close to the diagonal does the traffic
//!   stay (centrality, neighbor fraction, split fraction)?
//!
//! Metrics are plain functions of the matrix. Nothing is cached between
//! calls, so evaluating the same metric twice yields bit-identical results.
//!
//! Notation used in the per-metric docs: `C` is the `n x n` cost matrix,
//! `C(i)` its row `i`, and `T(i) = sum(C(i))` the row total.
//!
//! [`CommunicationMatrix`]: crate::matrix::CommunicationMatrix

pub mod amount;
pub mod balance;
pub mod heterogeneity;
pub mod locality;

pub use amount::communication_amount;
pub use balance::{communication_balance, communication_balance_v2};
pub use heterogeneity::{communication_heterogeneity, communication_heterogeneity_v2};
pub use locality::{
    DEFAULT_SPLIT_SIZE, communication_centrality, neighbor_communication_fraction, split_fraction,
};
