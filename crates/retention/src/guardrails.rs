//! Confidence guardrail: brief actions only execute once the brief's
//! confidence reaches the configured threshold.

use serde::{Deserialize, Serialize};

use crate::types::{BriefAction, WeeklyBrief};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailDecision {
    pub allowed: bool,
    pub confidence: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone)]
pub struct ConfidenceGuardrail {
    min_confidence: f64,
}

impl ConfidenceGuardrail {
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    pub fn evaluate(&self, brief: &WeeklyBrief) -> GuardrailDecision {
        GuardrailDecision {
            allowed: brief.confidence >= self.min_confidence,
            confidence: brief.confidence,
            threshold: self.min_confidence,
        }
    }

    /// Action log line for a blocked action.
    pub fn blocked_message(&self, action: &BriefAction, decision: &GuardrailDecision) -> String {
        format!(
            "Blocked: \"{}\" (confidence {}% < {}%)",
            action.label(),
            (decision.confidence * 100.0).round(),
            (decision.threshold * 100.0).round(),
        )
    }
}

impl Default for ConfidenceGuardrail {
    fn default() -> Self {
        Self::new(0.90)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn brief(confidence: f64) -> WeeklyBrief {
        WeeklyBrief {
            week_of: NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
            summary: String::new(),
            actions: vec![BriefAction::RetireCreative {
                label: "Retire Creative #3".into(),
                creative_id: Some("cr3".into()),
            }],
            confidence,
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let guard = ConfidenceGuardrail::default();
        assert!(guard.evaluate(&brief(0.90)).allowed);
        assert!(guard.evaluate(&brief(0.95)).allowed);
        assert!(!guard.evaluate(&brief(0.89)).allowed);
    }

    #[test]
    fn test_blocked_message() {
        let guard = ConfidenceGuardrail::default();
        let b = brief(0.8);
        let decision = guard.evaluate(&b);
        assert_eq!(
            guard.blocked_message(&b.actions[0], &decision),
            "Blocked: \"Retire Creative #3\" (confidence 80% < 90%)"
        );
    }
}
