//! Weekly brief generation: summarises the experiment, scores confidence and
//! prepares the recommended actions.

use chrono::{Datelike, Duration, NaiveDate};

use crate::incrementality::{most_fatigued, top_contributor};
use crate::types::{BriefAction, CreativeContribution, SegmentMetrics, WeeklyBrief};

const BUDGET_INCREASE_PCT: f64 = 0.15;
const CONFIDENCE_BASE: f64 = 0.6;
const CONFIDENCE_SAMPLE_WEIGHT: f64 = 0.3;
const CONFIDENCE_SAMPLE_SCALE: f64 = 50_000.0;
const CONFIDENCE_SEPARATION_CAP: f64 = 0.08;
const CONFIDENCE_CAP: f64 = 0.98;

/// `min(0.98, 0.6 + tanh(sample / 50k) × 0.3 + min(0.08, incremental_rate))`,
/// rounded to two decimals.
pub fn brief_confidence(sample_size: u64, incremental_rate: f64) -> f64 {
    let raw = CONFIDENCE_BASE
        + (sample_size as f64 / CONFIDENCE_SAMPLE_SCALE).tanh() * CONFIDENCE_SAMPLE_WEIGHT
        + incremental_rate.min(CONFIDENCE_SEPARATION_CAP);
    (raw.min(CONFIDENCE_CAP) * 100.0).round() / 100.0
}

/// Monday of the week containing `today`.
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}

pub fn generate_brief(
    contributions: &[CreativeContribution],
    segment: &SegmentMetrics,
    incremental_rate: f64,
    predicted_lift_pct: f64,
    today: NaiveDate,
) -> WeeklyBrief {
    let top = top_contributor(contributions);
    let fatigued = most_fatigued(contributions);

    let top_name = top.map(|c| c.name.as_str()).unwrap_or("N/A");
    let fatigued_name = fatigued.map(|c| c.name.as_str()).unwrap_or("N/A");

    let actions = vec![
        BriefAction::BudgetIncrease {
            label: format!("Raise budget +15% (top: {top_name})"),
            delta_pct: BUDGET_INCREASE_PCT,
            creative_id: top.map(|c| c.creative_id.clone()),
        },
        BriefAction::RetireCreative {
            label: format!(
                "Retire {}",
                fatigued.map(|c| c.name.as_str()).unwrap_or("Creative")
            ),
            creative_id: fatigued.map(|c| c.creative_id.clone()),
        },
    ];

    let summary = format!(
        "Incremental lift estimated at {predicted_lift_pct:.1}%. Top performer: {top_name}. \
         Underperforming (fatigue): {fatigued_name}. Recommended actions prepared."
    );

    WeeklyBrief {
        week_of: week_start(today),
        summary,
        actions,
        confidence: brief_confidence(segment.sample_size(), incremental_rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incrementality::{attribute, incremental_conversions, incremental_rate};
    use crate::types::{CreativeStatus, RetentionCreative};

    fn demo_contributions(segment: &SegmentMetrics) -> Vec<CreativeContribution> {
        let creatives = vec![
            RetentionCreative {
                id: "cr1".into(),
                name: "Creative #1 – Welcome Back".into(),
                status: CreativeStatus::Active,
                base_share: 0.42,
                fatigue: 0.18,
            },
            RetentionCreative {
                id: "cr3".into(),
                name: "Creative #3 – Free Shipping".into(),
                status: CreativeStatus::Active,
                base_share: 0.20,
                fatigue: 0.35,
            },
        ];
        attribute(&creatives, incremental_conversions(segment), 0.08)
    }

    #[test]
    fn test_confidence_formula() {
        let expected = 0.6 + (32_400.0f64 / 50_000.0).tanh() * 0.3 + (1_007.0 / 30_000.0);
        assert!((brief_confidence(32_400, 1_007.0 / 30_000.0) - (expected * 100.0).round() / 100.0).abs() < 1e-12);
        assert!((brief_confidence(32_400, 1_007.0 / 30_000.0) - 0.80).abs() < 1e-12);
        // Large samples and separation hit the cap.
        assert!((brief_confidence(10_000_000, 0.5) - 0.98).abs() < 1e-12);
        assert!((brief_confidence(0, 0.0) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_week_start_is_monday() {
        let wednesday = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let monday = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(week_start(wednesday), monday);
        assert_eq!(week_start(monday), monday);
        assert_eq!(week_start(sunday), monday);
    }

    #[test]
    fn test_generate_brief() {
        let segment = SegmentMetrics::seeded();
        let contributions = demo_contributions(&segment);
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let brief = generate_brief(&contributions, &segment, incremental_rate(&segment), 20.0, today);

        assert_eq!(brief.week_of, NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
        assert_eq!(
            brief.summary,
            "Incremental lift estimated at 20.0%. Top performer: Creative #1 – Welcome Back. \
             Underperforming (fatigue): Creative #3 – Free Shipping. Recommended actions prepared."
        );
        assert_eq!(brief.actions.len(), 2);
        assert_eq!(
            brief.actions[0],
            BriefAction::BudgetIncrease {
                label: "Raise budget +15% (top: Creative #1 – Welcome Back)".into(),
                delta_pct: 0.15,
                creative_id: Some("cr1".into()),
            }
        );
        assert_eq!(brief.actions[1].label(), "Retire Creative #3 – Free Shipping");
        assert!((brief.confidence - 0.80).abs() < 1e-12);
    }

    #[test]
    fn test_brief_without_creatives() {
        let segment = SegmentMetrics::seeded();
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let brief = generate_brief(&[], &segment, 0.0, 20.0, today);
        assert_eq!(brief.actions[0].label(), "Raise budget +15% (top: N/A)");
        assert_eq!(brief.actions[1].label(), "Retire Creative");
        assert!(brief.summary.contains("Top performer: N/A."));
    }
}
