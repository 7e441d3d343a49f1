//! Folds simulated outcomes into the campaign ledger and derives the
//! display series. The chart point carries its own noise layer on top of the
//! true aggregates; the ledger itself is never noised.

use sustainad_core::RandomSource;

use crate::simulator::wiggle;
use crate::types::{CampaignAggregates, CarbonReport, Creative, ServeHistoryPoint, SimulatedOutcome};

const CPA_DISPLAY_WIGGLE: f64 = 0.25;
const CARBON_DISPLAY_WIGGLE: f64 = 0.2;

impl CampaignAggregates {
    /// Add one outcome. Every field is a plain sum of increments.
    pub fn apply(&mut self, outcome: &SimulatedOutcome) {
        self.impressions += 1;
        self.clicks += outcome.clicks;
        self.conversions += outcome.conversions;
        self.spend += outcome.spend;
        self.revenue += outcome.revenue;
        self.total_co2_grams += outcome.co2_grams;
    }

    /// Spend per conversion. With no conversions the spend itself is
    /// reported, not zero or infinity.
    pub fn avg_cpa(&self) -> f64 {
        if self.conversions > 0.0 {
            self.spend / self.conversions
        } else {
            self.spend
        }
    }

    pub fn avg_roas(&self) -> f64 {
        if self.spend > 0.0 {
            self.revenue / self.spend
        } else {
            0.0
        }
    }

    /// Grams of CO2 per conversion. Falls back to the total with no
    /// conversions, mirroring [`Self::avg_cpa`].
    pub fn g_co2_per_conversion(&self) -> f64 {
        if self.conversions > 0.0 {
            self.total_co2_grams / self.conversions
        } else {
            self.total_co2_grams
        }
    }

    pub fn carbon_intensity(&self) -> f64 {
        if self.impressions > 0 {
            self.total_co2_grams / self.impressions as f64
        } else {
            0.0
        }
    }

    pub fn report(&self) -> CarbonReport {
        CarbonReport {
            avg_cpa: self.avg_cpa(),
            avg_roas: self.avg_roas(),
            g_co2_per_conversion: self.g_co2_per_conversion(),
            impressions: self.impressions,
        }
    }
}

impl Creative {
    /// Credit one won impression to this creative.
    pub fn record_win(&mut self, outcome: &SimulatedOutcome) {
        self.impressions += 1;
        self.clicks += outcome.clicks;
        self.conversions += outcome.conversions;
    }
}

/// Build the display point for the serve that just updated `aggregates`.
///
/// Draws twice: CPA noise first, then carbon noise. A spike widens both.
pub fn display_point(
    aggregates: &CampaignAggregates,
    serve_index: usize,
    spiked: bool,
    rng: &mut dyn RandomSource,
) -> ServeHistoryPoint {
    let true_cpa = aggregates.avg_cpa();
    let true_intensity = aggregates.carbon_intensity();

    let cpa_factor = if spiked {
        1.0 + (rng.next_f64() * 0.9 + 0.3)
    } else {
        wiggle(rng, CPA_DISPLAY_WIGGLE)
    };
    let carbon_factor = if spiked {
        1.0 + (rng.next_f64() * 0.7 + 0.2)
    } else {
        wiggle(rng, CARBON_DISPLAY_WIGGLE)
    };

    ServeHistoryPoint {
        serve_index,
        cpa: (true_cpa * cpa_factor).max(0.0),
        carbon_intensity: (true_intensity * carbon_factor).max(0.0),
    }
}
