//! Weekly incremental-lift series. A mock trend anchored on the measured lift,
//! sloped by how concentrated and how fatigued the creative mix is, plus a
//! weekly wave and jitter.

use serde::{Deserialize, Serialize};
use sustainad_core::RandomSource;

use crate::incrementality::{top_contributor, IncrementalityReport};
use crate::types::CreativeContribution;

const WAVE_PERIOD: f64 = 1.8;
const WAVE_AMPLITUDE: f64 = 1.4;
const EVENT_EVERY_WEEKS: usize = 5;
const EVENT_BUMP: f64 = 1.5;
const JITTER_SPAN: f64 = 0.8;
const SPIKE_PROBABILITY: f64 = 0.18;
const SPIKE_MIN: f64 = 2.5;
const SPIKE_MAX: f64 = 6.5;

/// Trend parameters derived from the current experiment state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiftModel {
    pub anchor: f64,
    pub slope: f64,
}

impl LiftModel {
    /// Anchor on the measured baseline lift when it is positive, else the
    /// predicted lift. Slope rises with the top creative's share and the
    /// incremental rate, and falls with average fatigue.
    pub fn from_experiment(
        report: &IncrementalityReport,
        contributions: &[CreativeContribution],
    ) -> Self {
        let anchor = if report.baseline_lift_pct.is_finite() && report.baseline_lift_pct > 0.0 {
            report.baseline_lift_pct
        } else if report.predicted_lift_pct.is_finite() {
            report.predicted_lift_pct
        } else {
            0.0
        };

        let total = (report.incremental_conversions as f64).max(1.0);
        let top_share = top_contributor(contributions)
            .map(|c| c.incremental_contribution / total)
            .unwrap_or(0.0);
        let avg_fatigue = contributions.iter().map(|c| c.fatigue).sum::<f64>()
            / (contributions.len() as f64).max(1.0);

        let slope = top_share * 6.0 - avg_fatigue * 3.0 + report.incremental_rate * 40.0 + 0.5;
        Self { anchor, slope }
    }

    fn trend(&self, week: usize) -> f64 {
        self.anchor + week as f64 * self.slope / 6.0
    }

    fn jitter(rng: &mut dyn RandomSource) -> f64 {
        (rng.next_f64() - 0.5) * JITTER_SPAN
    }

    /// Rebuild `weeks` points with the weekly wave and periodic campaign-event
    /// bump. One draw per week.
    pub fn build_series(&self, weeks: usize, rng: &mut dyn RandomSource) -> Vec<f64> {
        (0..weeks)
            .map(|i| {
                let wave = (i as f64 / WAVE_PERIOD).sin() * WAVE_AMPLITUDE;
                let bump = if i % EVENT_EVERY_WEEKS == 0 { EVENT_BUMP } else { 0.0 };
                (self.trend(i) + wave + bump + Self::jitter(rng)).max(0.0)
            })
            .collect()
    }

    /// Point for week index `week`, with an 18% chance of a ±2.5–6.5 spike.
    pub fn next_point(&self, week: usize, rng: &mut dyn RandomSource) -> f64 {
        let jitter = Self::jitter(rng);
        let spike = if rng.chance(SPIKE_PROBABILITY) {
            let sign = if rng.chance(0.5) { -1.0 } else { 1.0 };
            sign * rng.uniform(SPIKE_MIN, SPIKE_MAX)
        } else {
            0.0
        };
        (self.trend(week) + jitter + spike).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CreativeStatus, ExperimentStatus};
    use sustainad_core::FixedSequence;

    fn report(baseline: f64, incremental: u64, rate: f64) -> IncrementalityReport {
        IncrementalityReport {
            incremental_conversions: incremental,
            incremental_rate: rate,
            baseline_lift_pct: baseline,
            predicted_lift_pct: 20.0,
            status: ExperimentStatus::Green,
        }
    }

    fn contribution(id: &str, inc: f64, fatigue: f64) -> CreativeContribution {
        CreativeContribution {
            creative_id: id.into(),
            name: id.into(),
            status: CreativeStatus::Active,
            fatigue,
            weight: 0.0,
            incremental_contribution: inc,
        }
    }

    #[test]
    fn test_anchor_falls_back_to_predicted() {
        let model = LiftModel::from_experiment(&report(-1.0, 0, 0.0), &[]);
        assert_eq!(model.anchor, 20.0);
        assert!((model.slope - 0.5).abs() < 1e-12);

        let model = LiftModel::from_experiment(&report(f64::NAN, 0, 0.0), &[]);
        assert_eq!(model.anchor, 20.0);

        let model = LiftModel::from_experiment(&report(1.7, 0, 0.0), &[]);
        assert_eq!(model.anchor, 1.7);
    }

    #[test]
    fn test_slope_components() {
        let contributions = vec![contribution("a", 50.0, 0.2), contribution("b", 30.0, 0.4)];
        let model = LiftModel::from_experiment(&report(1.0, 100, 0.01), &contributions);
        let expected = 0.5 * 6.0 - 0.3 * 3.0 + 0.01 * 40.0 + 0.5;
        assert!((model.slope - expected).abs() < 1e-12);
    }

    #[test]
    fn test_build_series_shape() {
        let model = LiftModel {
            anchor: 3.0,
            slope: 1.2,
        };
        let mut seq = FixedSequence::new(vec![0.5]);
        let series = model.build_series(12, &mut seq);
        assert_eq!(series.len(), 12);
        assert_eq!(seq.draws(), 12);
        // Week 0: anchor + wave(0) + bump, jitter at midpoint.
        assert!((series[0] - 4.5).abs() < 1e-12);
        let week3 = 3.0 + 3.0 * 1.2 / 6.0 + (3.0f64 / 1.8).sin() * 1.4;
        assert!((series[3] - week3).abs() < 1e-12);
        assert!(series.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_series_floored_at_zero() {
        let model = LiftModel {
            anchor: 0.0,
            slope: -50.0,
        };
        let series = model.build_series(12, &mut FixedSequence::new(vec![0.0]));
        assert!(series.iter().skip(1).all(|v| *v == 0.0));
    }

    #[test]
    fn test_next_point_spike() {
        let model = LiftModel {
            anchor: 5.0,
            slope: 0.0,
        };
        // jitter 0.5 | spike yes | negative | magnitude 0.5 → 4.5
        let mut seq = FixedSequence::new(vec![0.5, 0.1, 0.2, 0.5]);
        assert!((model.next_point(12, &mut seq) - 0.5).abs() < 1e-12);

        // jitter 0.5 | no spike
        let mut seq = FixedSequence::new(vec![0.5, 0.9]);
        assert!((model.next_point(12, &mut seq) - 5.0).abs() < 1e-12);
        assert_eq!(seq.draws(), 2);
    }
}
