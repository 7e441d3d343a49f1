//! Incrementality measurement and creative attribution.
//!
//! Incremental conversions are exposed minus holdout conversions. They are
//! split across creatives with a path-based MTA share plus a static MMM prior
//! so no creative is zeroed out, discounted by creative fatigue.

use serde::{Deserialize, Serialize};

use crate::types::{CreativeContribution, ExperimentStatus, RetentionCreative, SegmentMetrics};

const FATIGUE_DISCOUNT: f64 = 0.6;
const MIN_EXPOSED_USERS: u64 = 10_000;
const MIN_HOLDOUT_USERS: u64 = 800;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncrementalityReport {
    /// `max(0, exposed − holdout)` conversions.
    pub incremental_conversions: u64,
    /// Incremental conversions per exposed user.
    pub incremental_rate: f64,
    /// Exposed minus holdout conversion rate, in percentage points.
    pub baseline_lift_pct: f64,
    pub predicted_lift_pct: f64,
    pub status: ExperimentStatus,
}

/// Signed exposed − holdout conversions.
pub fn conversion_delta(segment: &SegmentMetrics) -> i64 {
    segment.exposed_conversions as i64 - segment.holdout_conversions as i64
}

pub fn incremental_conversions(segment: &SegmentMetrics) -> u64 {
    conversion_delta(segment).max(0) as u64
}

pub fn incremental_rate(segment: &SegmentMetrics) -> f64 {
    if segment.exposed_users > 0 {
        incremental_conversions(segment) as f64 / segment.exposed_users as f64
    } else {
        0.0
    }
}

/// Red on a negative delta, yellow when underpowered, green otherwise.
pub fn experiment_status(segment: &SegmentMetrics) -> ExperimentStatus {
    let underpowered =
        segment.exposed_users < MIN_EXPOSED_USERS || segment.holdout_users < MIN_HOLDOUT_USERS;
    if conversion_delta(segment) < 0 {
        ExperimentStatus::Red
    } else if underpowered {
        ExperimentStatus::Yellow
    } else {
        ExperimentStatus::Green
    }
}

pub fn measure(segment: &SegmentMetrics, predicted_lift_pct: f64) -> IncrementalityReport {
    IncrementalityReport {
        incremental_conversions: incremental_conversions(segment),
        incremental_rate: incremental_rate(segment),
        baseline_lift_pct: (segment.exposed_rate() - segment.holdout_rate()) * 100.0,
        predicted_lift_pct,
        status: experiment_status(segment),
    }
}

/// Attribute `incremental` conversions across `creatives`.
///
/// `weight = (share + prior / n) / (Σ share + prior)`, then
/// `contribution = incremental × max(0, weight × (1 − fatigue × 0.6))`.
pub fn attribute(
    creatives: &[RetentionCreative],
    incremental: u64,
    mmm_prior: f64,
) -> Vec<CreativeContribution> {
    if creatives.is_empty() {
        return Vec::new();
    }
    let share_denom: f64 = creatives.iter().map(|c| c.base_share).sum::<f64>() + mmm_prior;
    let prior_each = mmm_prior / creatives.len() as f64;

    creatives
        .iter()
        .map(|c| {
            let weight = if share_denom > 0.0 {
                (c.base_share + prior_each) / share_denom
            } else {
                0.0
            };
            let adjusted = (weight * (1.0 - c.fatigue * FATIGUE_DISCOUNT)).max(0.0);
            CreativeContribution {
                creative_id: c.id.clone(),
                name: c.name.clone(),
                status: c.status,
                fatigue: c.fatigue,
                weight,
                incremental_contribution: incremental as f64 * adjusted,
            }
        })
        .collect()
}

/// First creative with the highest attributed contribution.
pub fn top_contributor(contributions: &[CreativeContribution]) -> Option<&CreativeContribution> {
    first_max_by(contributions, |c| c.incremental_contribution)
}

/// First creative with the highest fatigue.
pub fn most_fatigued(contributions: &[CreativeContribution]) -> Option<&CreativeContribution> {
    first_max_by(contributions, |c| c.fatigue)
}

fn first_max_by<T>(items: &[T], key: impl Fn(&T) -> f64) -> Option<&T> {
    items.iter().fold(None, |best, item| match best {
        Some(b) if key(item) <= key(b) => Some(b),
        _ => Some(item),
    })
}
