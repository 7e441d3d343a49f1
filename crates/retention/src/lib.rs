//! Retention Proof Lab: micro-holdout incrementality measurement, creative
//! attribution, weekly briefs gated by a confidence guardrail, and a mock
//! lift trend.

pub mod brief;
pub mod engine;
pub mod guardrails;
pub mod holdout;
pub mod incrementality;
pub mod lift;
pub mod types;

pub use engine::{ProofLab, ProofLabSnapshot};
pub use guardrails::{ConfidenceGuardrail, GuardrailDecision};
pub use incrementality::IncrementalityReport;
pub use lift::LiftModel;
pub use types::{
    ActionOutcome, BriefAction, Campaign, CreativeContribution, CreativeStatus, ExperimentStatus,
    RetentionCreative, SegmentMetrics, WeeklyBrief,
};
