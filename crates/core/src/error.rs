//! Error type shared by the engines.

use thiserror::Error;

pub type SustainAdResult<T> = Result<T, SustainAdError>;

#[derive(Error, Debug)]
pub enum SustainAdError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<config::ConfigError> for SustainAdError {
    fn from(err: config::ConfigError) -> Self {
        SustainAdError::Config(err.to_string())
    }
}
