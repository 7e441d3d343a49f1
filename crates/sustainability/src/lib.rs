//! Carbon ROAS optimizer: balances creative performance against the
//! compute weight of its format and simulates the resulting campaign economics.

pub mod aggregator;
pub mod engine;
pub mod ranker;
pub mod scorer;
pub mod simulator;
pub mod types;

pub use engine::CarbonOptimizer;
pub use ranker::{CreativeRanker, Ranking};
pub use scorer::carbon_score;
pub use simulator::OutcomeSimulator;
pub use types::{
    CampaignAggregates, CarbonReport, ComputeWeight, Creative, CreativeType, ServeDecision,
    ServeHistoryPoint,
};
