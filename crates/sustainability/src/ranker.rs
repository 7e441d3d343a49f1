use sustainad_core::config::Co2Table;

use crate::scorer::score_creative;
use crate::types::{Creative, ScoredCreative};

/// Result of ranking a creative set at a given slider value.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Index of the winner in the input slice.
    pub winner_index: usize,
    pub winner: ScoredCreative,
    /// Index of the heaviest creative by compute weight.
    pub heaviest_index: usize,
    pub winner_co2: f64,
    pub heaviest_co2: f64,
    /// Estimated CO2 saved versus serving the heaviest creative, in percent.
    pub co2_reduction_pct: i64,
}

/// Ranks creatives by `performance − carbon_penalty`.
#[derive(Debug, Clone)]
pub struct CreativeRanker {
    co2_table: Co2Table,
}

impl CreativeRanker {
    pub fn new(co2_table: Co2Table) -> Self {
        Self { co2_table }
    }

    /// Select the creative with the highest final score. Ties go to the
    /// earliest creative in input order. Returns `None` for an empty set.
    pub fn rank(&self, creatives: &[Creative], slider: u8) -> Option<Ranking> {
        let (winner_index, winner) = creatives
            .iter()
            .map(|c| score_creative(c, slider))
            .enumerate()
            .fold(None::<(usize, ScoredCreative)>, |best, (idx, scored)| match best {
                Some((best_idx, b)) if scored.final_score <= b.final_score => Some((best_idx, b)),
                _ => Some((idx, scored)),
            })?;

        let heaviest_index = creatives
            .iter()
            .enumerate()
            .fold(0, |best, (idx, c)| {
                if c.compute_weight() > creatives[best].compute_weight() {
                    idx
                } else {
                    best
                }
            });

        let winner_co2 = creatives[winner_index]
            .creative_type
            .co2_per_impression(&self.co2_table);
        let heaviest_co2 = creatives[heaviest_index]
            .creative_type
            .co2_per_impression(&self.co2_table);

        Some(Ranking {
            winner_index,
            winner,
            heaviest_index,
            winner_co2,
            heaviest_co2,
            co2_reduction_pct: co2_reduction_pct(heaviest_co2, winner_co2),
        })
    }

    /// Penalty and final score of every creative, in input order.
    pub fn preview(&self, creatives: &[Creative], slider: u8) -> Vec<ScoredCreative> {
        creatives.iter().map(|c| score_creative(c, slider)).collect()
    }

    pub fn co2_table(&self) -> &Co2Table {
        &self.co2_table
    }
}

impl Default for CreativeRanker {
    fn default() -> Self {
        Self::new(Co2Table::default())
    }
}

/// `round(100 × (heaviest − winner) / heaviest)`, 0 when `heaviest` is 0.
/// Halves round towards positive infinity.
pub fn co2_reduction_pct(heaviest_co2: f64, winner_co2: f64) -> i64 {
    if heaviest_co2 > 0.0 {
        ((heaviest_co2 - winner_co2) / heaviest_co2 * 100.0 + 0.5).floor() as i64
    } else {
        0
    }
}
