//! Carbon optimizer session. Runs the serve pipeline and keeps the ledger,
//! display history and transparency log for one session.

use sustainad_core::config::{OptimizerConfig, SessionConfig};
use sustainad_core::{LogEntry, RandomSource, SustainAdError, SustainAdResult, TransparencyLog};
use tracing::{debug, info};
use uuid::Uuid;

use crate::aggregator::display_point;
use crate::ranker::CreativeRanker;
use crate::scorer::SLIDER_MAX;
use crate::simulator::OutcomeSimulator;
use crate::types::{
    CampaignAggregates, CarbonReport, Creative, CreativeType, ScoredCreative, ServeDecision,
    ServeHistoryPoint,
};

const MIN_PERFORMANCE_SCORE: f64 = 1.0;
const MAX_PERFORMANCE_SCORE: f64 = 100.0;

/// Carbon ROAS optimizer session: owns the slider, the creative set, the
/// campaign ledger, the display history and the transparency log.
///
/// Every mutation goes through `&mut self`, so a session has exactly one
/// writer at a time.
#[derive(Debug, Clone)]
pub struct CarbonOptimizer {
    session_id: Uuid,
    slider: u8,
    creatives: Vec<Creative>,
    next_creative_seq: usize,
    aggregates: CampaignAggregates,
    history: Vec<ServeHistoryPoint>,
    log: TransparencyLog,
    ranker: CreativeRanker,
    simulator: OutcomeSimulator,
}

impl CarbonOptimizer {
    /// Create an empty session.
    pub fn new(optimizer: &OptimizerConfig, session: &SessionConfig) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            slider: optimizer.default_slider.min(SLIDER_MAX),
            creatives: Vec::new(),
            next_creative_seq: 1,
            aggregates: CampaignAggregates::default(),
            history: Vec::new(),
            log: TransparencyLog::new(session.log_capacity),
            ranker: CreativeRanker::new(optimizer.co2_grams_per_impression),
            simulator: OutcomeSimulator::new(optimizer),
        }
    }

    /// Create a session pre-loaded with the three demo creatives.
    pub fn with_demo_creatives(optimizer: &OptimizerConfig, session: &SessionConfig) -> Self {
        let mut engine = Self::new(optimizer, session);
        engine.seed_demo_creatives();
        engine
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn slider(&self) -> u8 {
        self.slider
    }

    /// Set the performance ↔ greener-mix preference, clamped to `[0, 100]`.
    pub fn set_slider(&mut self, value: u8) {
        self.slider = value.min(SLIDER_MAX);
    }

    /// Register a creative. The name is trimmed and must not be empty; the
    /// performance score is clamped to `[1, 100]`. Returns the new id.
    pub fn add_creative(
        &mut self,
        name: &str,
        creative_type: CreativeType,
        performance_score: f64,
    ) -> SustainAdResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SustainAdError::Validation(
                "creative name must not be empty".to_string(),
            ));
        }
        if performance_score.is_nan() {
            return Err(SustainAdError::Validation(
                "performance score must be a number".to_string(),
            ));
        }

        let id = format!("c{}", self.next_creative_seq);
        self.next_creative_seq += 1;

        let score = performance_score.clamp(MIN_PERFORMANCE_SCORE, MAX_PERFORMANCE_SCORE);
        info!(
            session_id = %self.session_id,
            creative_id = %id,
            creative_name = name,
            creative_type = %creative_type,
            weight = creative_type.compute_weight().value(),
            performance_score = score,
            "registered creative"
        );
        self.creatives
            .push(Creative::new(id.clone(), name, creative_type, score));
        Ok(id)
    }

    /// Seed the demo set. Counters carry historical-looking numbers for
    /// display; the campaign ledger still starts at zero.
    pub fn seed_demo_creatives(&mut self) {
        let seeds = [
            ("Spring Promo (IMG)", CreativeType::Image, 64.0, 4800, 72.0, 14.0),
            ("Summer Loop (GIF)", CreativeType::Gif, 72.0, 3600, 65.0, 10.0),
            ("Brand Story (VIDEO)", CreativeType::Video, 88.0, 0, 0.0, 0.0),
        ];
        for (name, creative_type, perf, impressions, clicks, conversions) in seeds {
            let id = format!("c{}", self.next_creative_seq);
            self.next_creative_seq += 1;
            self.creatives.push(Creative {
                impressions,
                clicks,
                conversions,
                ..Creative::new(id, name, creative_type, perf)
            });
        }
        info!(
            session_id = %self.session_id,
            count = self.creatives.len(),
            "seeded demo creatives"
        );
    }

    pub fn creatives(&self) -> &[Creative] {
        &self.creatives
    }

    pub fn get_creative(&self, id: &str) -> Option<&Creative> {
        self.creatives.iter().find(|c| c.id == id)
    }

    /// Current penalty and final score of every creative, in list order.
    pub fn preview(&self) -> Vec<ScoredCreative> {
        self.ranker.preview(&self.creatives, self.slider)
    }

    /// Serve one impression.
    ///
    /// 1. Ranks creatives by `performance − carbon_penalty`.
    /// 2. Simulates the winner's outcome.
    /// 3. Folds it into the ledger and the winner's counters.
    /// 4. Records an explanation in the transparency log.
    /// 5. Appends a display point to the history.
    ///
    /// With no creatives nothing happens and `None` is returned.
    pub fn serve_impression(&mut self, rng: &mut dyn RandomSource) -> Option<ServeDecision> {
        let ranking = self.ranker.rank(&self.creatives, self.slider)?;

        let winner = &self.creatives[ranking.winner_index];
        let winner_type = winner.creative_type;
        let outcome = self.simulator.simulate(winner, ranking.winner_co2, rng);

        self.creatives[ranking.winner_index].record_win(&outcome);
        self.aggregates.apply(&outcome);

        let explanation = explain(
            &ranking.winner,
            winner_type,
            ranking.co2_reduction_pct,
            outcome.spike.is_some(),
        );
        self.log.record(explanation.clone());

        let point = display_point(
            &self.aggregates,
            self.history.len() + 1,
            outcome.spike.is_some(),
            rng,
        );
        self.history.push(point.clone());

        info!(
            session_id = %self.session_id,
            creative_id = %ranking.winner.creative_id,
            final_score = ranking.winner.final_score,
            carbon_penalty = ranking.winner.carbon_penalty,
            co2_reduction_pct = ranking.co2_reduction_pct,
            slider = self.slider,
            impressions = self.aggregates.impressions,
            "served impression"
        );
        debug!(
            session_id = %self.session_id,
            serve_index = point.serve_index,
            cpa = point.cpa,
            carbon_intensity = point.carbon_intensity,
            "display point"
        );

        Some(ServeDecision {
            heaviest_id: self.creatives[ranking.heaviest_index].id.clone(),
            winner: ranking.winner,
            winner_type,
            co2_reduction_pct: ranking.co2_reduction_pct,
            outcome,
            history_point: point,
            explanation,
        })
    }

    /// Serve `count` impressions in sequence. Stops early on an empty set.
    pub fn serve_many(&mut self, count: usize, rng: &mut dyn RandomSource) -> Vec<ServeDecision> {
        (0..count)
            .map_while(|_| self.serve_impression(&mut *rng))
            .collect()
    }

    pub fn aggregates(&self) -> &CampaignAggregates {
        &self.aggregates
    }

    pub fn report(&self) -> CarbonReport {
        self.aggregates.report()
    }

    pub fn history(&self) -> &[ServeHistoryPoint] {
        &self.history
    }

    /// Transparency log, newest first.
    pub fn logs(&self) -> Vec<LogEntry> {
        self.log.to_vec()
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    pub fn clear_logs(&mut self) {
        self.log.clear();
    }
}

impl Default for CarbonOptimizer {
    fn default() -> Self {
        Self::new(&OptimizerConfig::default(), &SessionConfig::default())
    }
}

/// Human-readable explanation of a selection decision.
pub fn explain(
    winner: &ScoredCreative,
    winner_type: CreativeType,
    co2_reduction_pct: i64,
    spiked: bool,
) -> String {
    format!(
        "Picked {} ({}). Final score: {:.2} = perf {:.1} – carbon {:.2}. Estimated CO₂ reduced by ~{}% vs heaviest alternative.{}",
        winner_type,
        winner_type.compute_weight().label(),
        winner.final_score,
        winner.performance_score,
        winner.carbon_penalty,
        co2_reduction_pct,
        if spiked { " (Spike event occurred)" } else { "" },
    )
}
