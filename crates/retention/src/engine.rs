//! Proof Lab session over one retention campaign.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sustainad_core::config::{RetentionConfig, SessionConfig};
use sustainad_core::{LogEntry, RandomSource, TransparencyLog};
use tracing::{debug, info};

use crate::brief::generate_brief;
use crate::guardrails::ConfidenceGuardrail;
use crate::incrementality::{attribute, measure, IncrementalityReport};
use crate::lift::LiftModel;
use crate::types::{
    ActionOutcome, BriefAction, Campaign, CreativeContribution, CreativeStatus, RetentionCreative,
    SegmentMetrics, WeeklyBrief,
};

/// Point-in-time view of the experiment for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ProofLabSnapshot {
    pub campaign: Campaign,
    pub segment: SegmentMetrics,
    pub incrementality: IncrementalityReport,
    pub contributions: Vec<CreativeContribution>,
    pub brief: Option<WeeklyBrief>,
    pub lift_series: Vec<f64>,
    pub action_log: Vec<LogEntry>,
}

/// Proof Lab retention experiment session.
///
/// Incrementality and attribution are computed on read. An existing brief is
/// regenerated for its week when the holdout changes the segment.
#[derive(Debug, Clone)]
pub struct ProofLab {
    campaign: Campaign,
    segment: SegmentMetrics,
    creatives: Vec<RetentionCreative>,
    brief: Option<WeeklyBrief>,
    lift_series: Vec<f64>,
    action_log: TransparencyLog,
    guardrail: ConfidenceGuardrail,
    config: RetentionConfig,
}

impl ProofLab {
    pub fn new(
        campaign: Campaign,
        segment: SegmentMetrics,
        creatives: Vec<RetentionCreative>,
        config: &RetentionConfig,
        session: &SessionConfig,
    ) -> Self {
        Self {
            campaign,
            segment,
            creatives,
            brief: None,
            lift_series: Vec::new(),
            action_log: TransparencyLog::new(session.log_capacity),
            guardrail: ConfidenceGuardrail::new(config.guardrail_confidence),
            config: config.clone(),
        }
    }

    /// The demo campaign, segment and four creatives, with the holdout
    /// assigned, the first brief generated and the lift series built.
    pub fn demo(
        config: &RetentionConfig,
        session: &SessionConfig,
        today: NaiveDate,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let mut lab = Self::new(
            Campaign::demo(),
            SegmentMetrics::seeded(),
            demo_creatives(),
            config,
            session,
        );
        lab.assign_holdout(rng);
        lab.refresh_brief(today);
        lab.rebuild_lift_series(rng);
        lab
    }

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    pub fn segment(&self) -> &SegmentMetrics {
        &self.segment
    }

    pub fn creatives(&self) -> &[RetentionCreative] {
        &self.creatives
    }

    /// Assign the micro-holdout, re-size the segment and regenerate any
    /// existing brief. No-op once assigned.
    pub fn assign_holdout(&mut self, rng: &mut dyn RandomSource) -> bool {
        if !self.campaign.assign_holdout(rng) {
            return false;
        }
        self.segment
            .resync_holdout(self.campaign.effective_holdout_pct());
        debug!(
            campaign_id = %self.campaign.id,
            holdout_users = self.segment.holdout_users,
            holdout_conversions = self.segment.holdout_conversions,
            "resynced holdout segment"
        );
        if let Some(week_of) = self.brief.as_ref().map(|b| b.week_of) {
            self.refresh_brief(week_of);
        }
        true
    }

    pub fn incrementality(&self) -> IncrementalityReport {
        measure(&self.segment, self.config.predicted_lift_pct)
    }

    pub fn contributions(&self) -> Vec<CreativeContribution> {
        attribute(
            &self.creatives,
            self.incrementality().incremental_conversions,
            self.config.mmm_prior,
        )
    }

    /// Regenerate the weekly brief for the week containing `today`.
    pub fn refresh_brief(&mut self, today: NaiveDate) -> &WeeklyBrief {
        let report = self.incrementality();
        let brief = generate_brief(
            &self.contributions(),
            &self.segment,
            report.incremental_rate,
            report.predicted_lift_pct,
            today,
        );
        info!(
            campaign_id = %self.campaign.id,
            week_of = %brief.week_of,
            confidence = brief.confidence,
            "generated weekly brief"
        );
        self.brief.insert(brief)
    }

    pub fn brief(&self) -> Option<&WeeklyBrief> {
        self.brief.as_ref()
    }

    /// Apply the brief action at `index`. Below the guardrail confidence the
    /// action is blocked; either way the outcome is logged.
    pub fn apply_action(&mut self, index: usize) -> ActionOutcome {
        let Some(brief) = self.brief.as_ref() else {
            return ActionOutcome::NoBrief;
        };
        let Some(action) = brief.actions.get(index).cloned() else {
            return ActionOutcome::NoBrief;
        };

        let decision = self.guardrail.evaluate(brief);
        if !decision.allowed {
            let message = self.guardrail.blocked_message(&action, &decision);
            debug!(campaign_id = %self.campaign.id, action = action.label(), "action blocked");
            self.action_log.record(message.clone());
            return ActionOutcome::Blocked { message };
        }

        if let BriefAction::RetireCreative {
            creative_id: Some(id),
            ..
        } = &action
        {
            if let Some(creative) = self.creatives.iter_mut().find(|c| &c.id == id) {
                creative.status = CreativeStatus::RetireSuggested;
            }
        }

        let message = format!("Applied: {}", action.label());
        info!(campaign_id = %self.campaign.id, action = action.label(), "action applied");
        self.action_log.record(message.clone());
        ActionOutcome::Applied { message }
    }

    /// Action log, newest first.
    pub fn action_log(&self) -> Vec<LogEntry> {
        self.action_log.to_vec()
    }

    pub fn lift_model(&self) -> LiftModel {
        LiftModel::from_experiment(&self.incrementality(), &self.contributions())
    }

    pub fn rebuild_lift_series(&mut self, rng: &mut dyn RandomSource) -> &[f64] {
        self.lift_series = self.lift_model().build_series(self.config.lift_weeks, rng);
        &self.lift_series
    }

    /// Append one week to the lift series and return its value.
    pub fn append_week(&mut self, rng: &mut dyn RandomSource) -> f64 {
        let value = self.lift_model().next_point(self.lift_series.len(), rng);
        self.lift_series.push(value);
        value
    }

    pub fn reset_lift_series(&mut self) {
        self.lift_series.clear();
    }

    pub fn lift_series(&self) -> &[f64] {
        &self.lift_series
    }

    pub fn snapshot(&self) -> ProofLabSnapshot {
        ProofLabSnapshot {
            campaign: self.campaign.clone(),
            segment: self.segment,
            incrementality: self.incrementality(),
            contributions: self.contributions(),
            brief: self.brief.clone(),
            lift_series: self.lift_series.clone(),
            action_log: self.action_log(),
        }
    }
}

/// Today's date in UTC, for brief generation.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn demo_creatives() -> Vec<RetentionCreative> {
    [
        ("cr1", "Creative #1 – Welcome Back", 0.42, 0.18),
        ("cr2", "Creative #2 – 10% Off", 0.31, 0.12),
        ("cr3", "Creative #3 – Free Shipping", 0.20, 0.35),
        ("cr4", "Creative #4 – Loyalty Points", 0.07, 0.05),
    ]
    .into_iter()
    .map(|(id, name, base_share, fatigue)| RetentionCreative {
        id: id.to_string(),
        name: name.to_string(),
        status: CreativeStatus::Active,
        base_share,
        fatigue,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExperimentStatus;
    use sustainad_core::FixedSequence;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
    }

    fn demo_lab(config: &RetentionConfig) -> ProofLab {
        // Holdout draw 0.6 → 8%; the rest feeds the lift jitter.
        let mut seq = FixedSequence::new(vec![0.6, 0.5]);
        ProofLab::demo(config, &SessionConfig::default(), monday(), &mut seq)
    }

    #[test]
    fn test_demo_state() {
        let lab = demo_lab(&RetentionConfig::default());
        assert!(lab.campaign().holdout_assigned);
        assert!((lab.campaign().holdout_pct - 0.08).abs() < 1e-12);
        assert_eq!(lab.segment().holdout_users, 2_400);

        let report = lab.incrementality();
        assert_eq!(report.incremental_conversions, 1_007);
        assert_eq!(report.status, ExperimentStatus::Green);

        let brief = lab.brief().unwrap();
        assert_eq!(brief.week_of, monday());
        assert!((brief.confidence - 0.80).abs() < 1e-12);
        assert_eq!(lab.lift_series().len(), 12);
    }

    #[test]
    fn test_no_brief_is_noop() {
        let mut lab = ProofLab::new(
            Campaign::demo(),
            SegmentMetrics::seeded(),
            demo_creatives(),
            &RetentionConfig::default(),
            &SessionConfig::default(),
        );
        assert_eq!(lab.apply_action(0), ActionOutcome::NoBrief);
        assert!(lab.action_log().is_empty());
    }

    #[test]
    fn test_low_confidence_blocks() {
        let mut lab = demo_lab(&RetentionConfig::default());
        let outcome = lab.apply_action(1);
        assert_eq!(
            outcome,
            ActionOutcome::Blocked {
                message: "Blocked: \"Retire Creative #3 – Free Shipping\" (confidence 80% < 90%)"
                    .into()
            }
        );
        assert!(lab
            .creatives()
            .iter()
            .all(|c| c.status == CreativeStatus::Active));
        assert_eq!(lab.action_log().len(), 1);
    }

    #[test]
    fn test_confident_actions_apply() {
        let config = RetentionConfig {
            guardrail_confidence: 0.75,
            ..RetentionConfig::default()
        };
        let mut lab = demo_lab(&config);

        let outcome = lab.apply_action(0);
        assert_eq!(
            outcome,
            ActionOutcome::Applied {
                message: "Applied: Raise budget +15% (top: Creative #1 – Welcome Back)".into()
            }
        );

        let outcome = lab.apply_action(1);
        assert!(matches!(outcome, ActionOutcome::Applied { .. }));
        let retired = lab.creatives().iter().find(|c| c.id == "cr3").unwrap();
        assert_eq!(retired.status, CreativeStatus::RetireSuggested);

        let log = lab.action_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].text, "Applied: Retire Creative #3 – Free Shipping");

        assert_eq!(lab.apply_action(7), ActionOutcome::NoBrief);
    }

    #[test]
    fn test_lift_series_append_and_reset() {
        let mut lab = demo_lab(&RetentionConfig::default());
        let mut seq = FixedSequence::new(vec![0.5, 0.9]);
        let value = lab.append_week(&mut seq);
        assert_eq!(lab.lift_series().len(), 13);
        assert_eq!(lab.lift_series()[12], value);
        assert!(value >= 0.0);

        lab.reset_lift_series();
        assert!(lab.lift_series().is_empty());
        lab.append_week(&mut seq);
        assert_eq!(lab.lift_series().len(), 1);
    }

    #[test]
    fn test_holdout_assignment_regenerates_brief() {
        let mut lab = ProofLab::new(
            Campaign::demo(),
            SegmentMetrics::seeded(),
            demo_creatives(),
            &RetentionConfig::default(),
            &SessionConfig::default(),
        );
        let before = lab.refresh_brief(monday()).clone();
        assert!((before.confidence - 0.80).abs() < 1e-12);

        // Draw 0.99 → 10% holdout, 3 000 users.
        assert!(lab.assign_holdout(&mut FixedSequence::new(vec![0.99])));
        assert_eq!(lab.segment().holdout_users, 3_000);

        let after = lab.brief().unwrap();
        assert_eq!(after.week_of, before.week_of);
        let expected = crate::brief::brief_confidence(
            lab.segment().sample_size(),
            lab.incrementality().incremental_rate,
        );
        assert!((after.confidence - expected).abs() < 1e-12);
        assert!((after.confidence - 0.81).abs() < 1e-12);
    }

    #[test]
    fn test_assign_holdout_only_once() {
        let mut lab = demo_lab(&RetentionConfig::default());
        let before = *lab.segment();
        assert!(!lab.assign_holdout(&mut FixedSequence::new(vec![0.0])));
        assert_eq!(*lab.segment(), before);
    }
}
