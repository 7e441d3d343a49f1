//! Application configuration.

use std::path::Path;

use serde::Deserialize;

use crate::error::SustainAdResult;

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `SUSTAINAD__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
    /// Seed for a reproducible session. Unset means thread-local entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

// ─── Carbon Optimizer Config ────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerConfig {
    #[serde(default = "default_slider")]
    pub default_slider: u8,
    #[serde(default = "default_spend_per_impression")]
    pub spend_per_impression: f64,
    #[serde(default = "default_revenue_per_conversion")]
    pub revenue_per_conversion: f64,
    #[serde(default = "default_spike_probability")]
    pub spike_probability: f64,
    #[serde(default)]
    pub co2_grams_per_impression: Co2Table,
}

/// Grams of CO2 emitted per impression, by creative format.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Co2Table {
    #[serde(default = "default_co2_image")]
    pub image: f64,
    #[serde(default = "default_co2_gif")]
    pub gif: f64,
    #[serde(default = "default_co2_video")]
    pub video: f64,
}

// ─── Retention Proof Lab Config ─────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_guardrail_confidence")]
    pub guardrail_confidence: f64,
    #[serde(default = "default_mmm_prior")]
    pub mmm_prior: f64,
    #[serde(default = "default_lift_weeks")]
    pub lift_weeks: usize,
    #[serde(default = "default_predicted_lift_pct")]
    pub predicted_lift_pct: f64,
}

fn default_log_capacity() -> usize {
    200
}
fn default_slider() -> u8 {
    50
}
fn default_spend_per_impression() -> f64 {
    0.15
}
fn default_revenue_per_conversion() -> f64 {
    30.0
}
fn default_spike_probability() -> f64 {
    0.12
}
fn default_co2_image() -> f64 {
    0.2
}
fn default_co2_gif() -> f64 {
    0.6
}
fn default_co2_video() -> f64 {
    2.0
}
fn default_guardrail_confidence() -> f64 {
    0.90
}
fn default_mmm_prior() -> f64 {
    0.08
}
fn default_lift_weeks() -> usize {
    12
}
fn default_predicted_lift_pct() -> f64 {
    20.0
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            log_capacity: default_log_capacity(),
            rng_seed: None,
        }
    }
}

impl Default for Co2Table {
    fn default() -> Self {
        Self {
            image: default_co2_image(),
            gif: default_co2_gif(),
            video: default_co2_video(),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            default_slider: default_slider(),
            spend_per_impression: default_spend_per_impression(),
            revenue_per_conversion: default_revenue_per_conversion(),
            spike_probability: default_spike_probability(),
            co2_grams_per_impression: Co2Table::default(),
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            guardrail_confidence: default_guardrail_confidence(),
            mmm_prior: default_mmm_prior(),
            lift_weeks: default_lift_weeks(),
            predicted_lift_pct: default_predicted_lift_pct(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            optimizer: OptimizerConfig::default(),
            retention: RetentionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables only.
    pub fn load() -> SustainAdResult<Self> {
        Self::load_from(None)
    }

    /// Load configuration from an optional TOML file, then environment
    /// variables. Environment values win.
    pub fn load_from(path: Option<&Path>) -> SustainAdResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("SUSTAINAD")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
