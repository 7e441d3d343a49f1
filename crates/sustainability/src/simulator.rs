//! Outcome simulation: synthesizes click, conversion, spend and CO2 deltas
//! for a served creative. Ledger values come only from here; the display
//! series adds its own noise in the aggregator.

use sustainad_core::config::OptimizerConfig;
use sustainad_core::RandomSource;
use tracing::debug;

use crate::types::{Creative, SimulatedOutcome, SpikeEvent};

const CLICK_RATE_PER_POINT: f64 = 0.003;
const CONVERSION_RATE_PER_POINT: f64 = 0.0012;
const OUTCOME_WIGGLE: f64 = 0.2;
const SPEND_WIGGLE: f64 = 0.1;
const CONVERSION_DIP_FACTOR: f64 = 0.2;
const SPEND_SURGE_FACTOR: f64 = 2.2;
const DIP_SHARE_OF_SPIKES: f64 = 0.5;

/// Multiplicative jitter `1 + uniform(-1, 1) × range`.
pub fn wiggle(rng: &mut dyn RandomSource, range: f64) -> f64 {
    1.0 + (rng.next_f64() * 2.0 - 1.0) * range
}

#[derive(Debug, Clone)]
pub struct OutcomeSimulator {
    spend_per_impression: f64,
    revenue_per_conversion: f64,
    spike_probability: f64,
}

impl OutcomeSimulator {
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            spend_per_impression: config.spend_per_impression,
            revenue_per_conversion: config.revenue_per_conversion,
            spike_probability: config.spike_probability,
        }
    }

    /// Simulate one impression of `creative`.
    ///
    /// Draw order: spike, dip-vs-surge (only on a spike), click jitter,
    /// conversion jitter (skipped on a dip), spend jitter (skipped on a surge).
    pub fn simulate(
        &self,
        creative: &Creative,
        co2_grams: f64,
        rng: &mut dyn RandomSource,
    ) -> SimulatedOutcome {
        let base_clicks = creative.performance_score * CLICK_RATE_PER_POINT;
        let base_conversions = creative.performance_score * CONVERSION_RATE_PER_POINT;

        let spike = if rng.chance(self.spike_probability) {
            if rng.chance(DIP_SHARE_OF_SPIKES) {
                Some(SpikeEvent::ConversionDip)
            } else {
                Some(SpikeEvent::SpendSurge)
            }
        } else {
            None
        };

        let clicks = base_clicks * wiggle(rng, OUTCOME_WIGGLE);

        let conversion_factor = match spike {
            Some(SpikeEvent::ConversionDip) => CONVERSION_DIP_FACTOR,
            _ => wiggle(rng, OUTCOME_WIGGLE),
        };
        let conversions = (base_conversions * conversion_factor).max(0.0);

        let spend_factor = match spike {
            Some(SpikeEvent::SpendSurge) => SPEND_SURGE_FACTOR,
            _ => wiggle(rng, SPEND_WIGGLE),
        };
        let spend = self.spend_per_impression * spend_factor;

        if let Some(event) = spike {
            debug!(creative_id = %creative.id, ?event, "spike event");
        }

        SimulatedOutcome {
            clicks,
            conversions,
            spend,
            revenue: conversions * self.revenue_per_conversion,
            co2_grams,
            spike,
        }
    }
}

impl Default for OutcomeSimulator {
    fn default() -> Self {
        Self::new(&OptimizerConfig::default())
    }
}
