#![forbid(unsafe_code)]
//! commstats-core library.
//!
//! Scalar statistics describing the communication pattern of a parallel
//! application, computed from a square cost matrix.
//!
//! # Conventions
//!
//! - **Errors**: Fallible operations return [`error::Result`]; every
//!   [`error::StatsError`] maps onto an [`error::ErrorKind`] with a stable code.
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`). The library
//!   never installs a subscriber.
//! - **I/O**: None. Callers hand in parsed rows and get `f64` values back.

pub mod engine;
pub mod error;
pub mod matrix;
pub mod metrics;

pub use engine::{Metric, StatisticsEngine};
pub use error::{ErrorKind, Result, StatsError};
pub use matrix::{CommunicationMatrix, validate};
