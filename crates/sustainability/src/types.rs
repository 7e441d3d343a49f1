//! Creative, ledger and serve-decision types.

use std::fmt;

use serde::{Deserialize, Serialize};
use sustainad_core::config::Co2Table;

/// Creative format. Determines the compute weight and CO2 footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreativeType {
    Image,
    #[serde(rename = "GIF")]
    Gif,
    Video,
}

impl CreativeType {
    pub fn compute_weight(self) -> ComputeWeight {
        match self {
            CreativeType::Image => ComputeWeight::Light,
            CreativeType::Gif => ComputeWeight::Medium,
            CreativeType::Video => ComputeWeight::Heavy,
        }
    }

    /// Grams of CO2 per impression for this format.
    pub fn co2_per_impression(self, table: &Co2Table) -> f64 {
        match self {
            CreativeType::Image => table.image,
            CreativeType::Gif => table.gif,
            CreativeType::Video => table.video,
        }
    }
}

impl fmt::Display for CreativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CreativeType::Image => "Image",
            CreativeType::Gif => "GIF",
            CreativeType::Video => "Video",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for CreativeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" | "img" => Ok(CreativeType::Image),
            "gif" => Ok(CreativeType::Gif),
            "video" => Ok(CreativeType::Video),
            other => Err(format!("unknown creative type: {other}")),
        }
    }
}

/// Rendering/delivery cost proxy, 1 (light) to 3 (heavy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComputeWeight {
    Light = 1,
    Medium = 2,
    Heavy = 3,
}

impl ComputeWeight {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            ComputeWeight::Light => "Light",
            ComputeWeight::Medium => "Medium",
            ComputeWeight::Heavy => "Heavy",
        }
    }
}

/// One advertising asset competing for impressions.
///
/// `clicks` and `conversions` are fractional synthetic increments, so
/// `clicks <= impressions` is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creative {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub creative_type: CreativeType,
    pub performance_score: f64,
    pub impressions: u64,
    pub clicks: f64,
    pub conversions: f64,
}

impl Creative {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        creative_type: CreativeType,
        performance_score: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            creative_type,
            performance_score,
            impressions: 0,
            clicks: 0.0,
            conversions: 0.0,
        }
    }

    /// Derived from the type; there is no way to set it independently.
    pub fn compute_weight(&self) -> ComputeWeight {
        self.creative_type.compute_weight()
    }
}

/// Campaign-level running totals, zeroed at session start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignAggregates {
    pub spend: f64,
    pub revenue: f64,
    pub impressions: u64,
    pub clicks: f64,
    pub conversions: f64,
    pub total_co2_grams: f64,
}

/// One point of the CPA vs carbon-intensity series. Values are display-noised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServeHistoryPoint {
    pub serve_index: usize,
    pub cpa: f64,
    pub carbon_intensity: f64,
}

/// Synthetic increments produced for one served impression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedOutcome {
    pub clicks: f64,
    pub conversions: f64,
    pub spend: f64,
    pub revenue: f64,
    pub co2_grams: f64,
    pub spike: Option<SpikeEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpikeEvent {
    ConversionDip,
    SpendSurge,
}

/// Penalty and final score of one creative at the current slider value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCreative {
    pub creative_id: String,
    pub performance_score: f64,
    pub carbon_penalty: f64,
    pub final_score: f64,
}

/// Outcome of one "serve impression" action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServeDecision {
    pub winner: ScoredCreative,
    pub winner_type: CreativeType,
    pub heaviest_id: String,
    pub co2_reduction_pct: i64,
    pub outcome: SimulatedOutcome,
    pub history_point: ServeHistoryPoint,
    pub explanation: String,
}

/// On-demand carbon report derived from the aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonReport {
    pub avg_cpa: f64,
    pub avg_roas: f64,
    pub g_co2_per_conversion: f64,
    pub impressions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_follows_type() {
        assert_eq!(CreativeType::Image.compute_weight(), ComputeWeight::Light);
        assert_eq!(CreativeType::Gif.compute_weight(), ComputeWeight::Medium);
        assert_eq!(CreativeType::Video.compute_weight(), ComputeWeight::Heavy);
        assert_eq!(ComputeWeight::Heavy.value(), 3);
        assert_eq!(ComputeWeight::Medium.label(), "Medium");
    }

    #[test]
    fn test_creative_json_has_type_not_weight() {
        let creative = Creative::new("c1".to_string(), "Loop", CreativeType::Gif, 72.0);
        let json = serde_json::to_value(&creative).unwrap();
        assert_eq!(json["type"], "GIF");
        assert!(json.get("compute_weight").is_none());
        assert_eq!(creative.compute_weight(), ComputeWeight::Medium);
    }
}
