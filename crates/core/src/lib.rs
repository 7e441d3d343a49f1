//! Shared building blocks for the SustainAd engines: configuration, errors,
//! the injectable random source and the bounded transparency log.

pub mod config;
pub mod error;
pub mod log;
pub mod random;

pub use config::AppConfig;
pub use error::{SustainAdError, SustainAdResult};
pub use log::{LogEntry, TransparencyLog};
pub use random::{FixedSequence, RandomSource, RngSource};
