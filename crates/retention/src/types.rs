//! Campaign, segment, creative and brief types for the Proof Lab.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A retention campaign running a micro-holdout experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub audience_size: u64,
    /// Share of users withheld, in `[0.05, 0.10]` once assigned.
    pub holdout_pct: f64,
    pub holdout_assigned: bool,
}

/// Exposed vs holdout user and conversion counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentMetrics {
    pub exposed_users: u64,
    pub holdout_users: u64,
    pub exposed_conversions: u64,
    pub holdout_conversions: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreativeStatus {
    Active,
    Paused,
    RetireSuggested,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionCreative {
    pub id: String,
    pub name: String,
    pub status: CreativeStatus,
    /// Share of path contribution.
    pub base_share: f64,
    /// 0..1, higher means more fatigued.
    pub fatigue: f64,
}

/// A creative with its attributed share of incremental conversions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativeContribution {
    pub creative_id: String,
    pub name: String,
    pub status: CreativeStatus,
    pub fatigue: f64,
    pub weight: f64,
    pub incremental_contribution: f64,
}

/// Recommended action carried by a weekly brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BriefAction {
    BudgetIncrease {
        label: String,
        delta_pct: f64,
        creative_id: Option<String>,
    },
    RetireCreative {
        label: String,
        creative_id: Option<String>,
    },
}

impl BriefAction {
    pub fn label(&self) -> &str {
        match self {
            BriefAction::BudgetIncrease { label, .. } | BriefAction::RetireCreative { label, .. } => {
                label
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBrief {
    /// Monday of the week the brief covers.
    pub week_of: NaiveDate,
    pub summary: String,
    pub actions: Vec<BriefAction>,
    /// 0..1, rounded to two decimals.
    pub confidence: f64,
}

/// Traffic-light health of the experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentStatus {
    Green,
    Yellow,
    Red,
}

impl ExperimentStatus {
    pub fn label(self) -> &'static str {
        match self {
            ExperimentStatus::Green => "Healthy",
            ExperimentStatus::Yellow => "Underpowered",
            ExperimentStatus::Red => "Negative",
        }
    }
}

/// Result of trying to apply a brief action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ActionOutcome {
    Applied { message: String },
    Blocked { message: String },
    /// No brief has been generated yet; nothing happened.
    NoBrief,
}
