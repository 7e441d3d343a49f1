//! Micro-holdout assignment: withholds 5–10% of a campaign's audience so
//! incremental conversions can be measured against an unexposed baseline.

use sustainad_core::RandomSource;
use tracing::info;

use crate::types::{Campaign, SegmentMetrics};

pub const MIN_HOLDOUT_PCT: f64 = 0.05;
pub const MAX_HOLDOUT_PCT: f64 = 0.10;
/// Used until a campaign has its own holdout share.
pub const FALLBACK_HOLDOUT_PCT: f64 = 0.08;

const SEED_EXPOSED_USERS: u64 = 30_000;
const EXPOSED_CONVERSION_RATE: f64 = 0.035;
const HOLDOUT_CONVERSION_RATE: f64 = 0.018;

impl Campaign {
    pub fn new(id: impl Into<String>, name: impl Into<String>, audience_size: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            audience_size,
            holdout_pct: 0.0,
            holdout_assigned: false,
        }
    }

    /// The demo "Loyalty Re-Engagement – Q4" campaign.
    pub fn demo() -> Self {
        Self::new("cmp-42", "Loyalty Re-Engagement – Q4", 120_000)
    }

    /// Draw the holdout share once, rounded to whole percent in
    /// `[0.05, 0.10]`. Returns `false` if it was already assigned.
    pub fn assign_holdout(&mut self, rng: &mut dyn RandomSource) -> bool {
        if self.holdout_assigned {
            return false;
        }
        let raw = rng.uniform(MIN_HOLDOUT_PCT, MAX_HOLDOUT_PCT);
        self.holdout_pct = (raw * 100.0).round() / 100.0;
        self.holdout_assigned = true;
        info!(campaign_id = %self.id, holdout_pct = self.holdout_pct, "assigned holdout");
        true
    }

    /// Holdout share to size the segment with; falls back to 8% while
    /// unassigned.
    pub fn effective_holdout_pct(&self) -> f64 {
        if self.holdout_pct > 0.0 {
            self.holdout_pct
        } else {
            FALLBACK_HOLDOUT_PCT
        }
    }
}

impl SegmentMetrics {
    /// Mock segment: 30 000 exposed users converting at 3.5%, an 8% holdout
    /// converting at 1.8%.
    pub fn seeded() -> Self {
        let exposed_users = SEED_EXPOSED_USERS;
        let holdout_users = (exposed_users as f64 * FALLBACK_HOLDOUT_PCT).floor() as u64;
        Self {
            exposed_users,
            holdout_users,
            exposed_conversions: (exposed_users as f64 * EXPOSED_CONVERSION_RATE).floor() as u64,
            holdout_conversions: (holdout_users as f64 * HOLDOUT_CONVERSION_RATE).floor() as u64,
        }
    }

    /// Re-size the holdout after the campaign's share changes. At least one
    /// holdout user is kept.
    pub fn resync_holdout(&mut self, holdout_pct: f64) {
        let pct = if holdout_pct > 0.0 {
            holdout_pct
        } else {
            FALLBACK_HOLDOUT_PCT
        };
        self.holdout_users = ((self.exposed_users as f64 * pct).floor() as u64).max(1);
        self.holdout_conversions =
            (self.holdout_users as f64 * HOLDOUT_CONVERSION_RATE).floor() as u64;
    }

    pub fn exposed_rate(&self) -> f64 {
        safe_rate(self.exposed_conversions, self.exposed_users)
    }

    pub fn holdout_rate(&self) -> f64 {
        safe_rate(self.holdout_conversions, self.holdout_users)
    }

    pub fn sample_size(&self) -> u64 {
        self.exposed_users + self.holdout_users
    }
}

pub(crate) fn safe_rate(conversions: u64, users: u64) -> f64 {
    if users > 0 {
        conversions as f64 / users as f64
    } else {
        0.0
    }
}
