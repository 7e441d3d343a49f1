//! Carbon scoring: turns a creative's compute weight and the optimizer
//! slider into a penalty subtracted from its performance score.

use crate::types::{ComputeWeight, Creative, ScoredCreative};

/// Upper bound of the performance ↔ greener-mix slider.
pub const SLIDER_MAX: u8 = 100;

/// `carbon_score = compute_weight × slider / 100`.
///
/// Monotonically non-decreasing in both arguments. The slider is expected in
/// `[0, 100]`; callers clamp it on input.
pub fn carbon_score(weight: ComputeWeight, slider: u8) -> f64 {
    f64::from(weight.value()) * f64::from(slider) / 100.0
}

/// Score one creative: `final = performance − carbon_score`.
pub fn score_creative(creative: &Creative, slider: u8) -> ScoredCreative {
    let carbon_penalty = carbon_score(creative.compute_weight(), slider);
    ScoredCreative {
        creative_id: creative.id.clone(),
        performance_score: creative.performance_score,
        carbon_penalty,
        final_score: creative.performance_score - carbon_penalty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CreativeType;

    const WEIGHTS: [ComputeWeight; 3] = [
        ComputeWeight::Light,
        ComputeWeight::Medium,
        ComputeWeight::Heavy,
    ];

    #[test]
    fn test_formula_over_full_domain() {
        for w in WEIGHTS {
            for s in 0..=SLIDER_MAX {
                let expected = w.value() as f64 * s as f64 / 100.0;
                assert!((carbon_score(w, s) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_monotonic_in_slider_and_weight() {
        for w in WEIGHTS {
            let mut prev = carbon_score(w, 0);
            for s in 1..=SLIDER_MAX {
                let next = carbon_score(w, s);
                assert!(next >= prev);
                prev = next;
            }
        }
        for s in 0..=SLIDER_MAX {
            assert!(carbon_score(ComputeWeight::Light, s) <= carbon_score(ComputeWeight::Medium, s));
            assert!(carbon_score(ComputeWeight::Medium, s) <= carbon_score(ComputeWeight::Heavy, s));
        }
    }

    #[test]
    fn test_video_at_half_slider() {
        assert!((carbon_score(ComputeWeight::Heavy, 50) - 1.5).abs() < 1e-12);

        let video = Creative::new("c3", "Brand Story (VIDEO)", CreativeType::Video, 88.0);
        let scored = score_creative(&video, 50);
        assert!((scored.carbon_penalty - 1.5).abs() < 1e-12);
        assert!((scored.final_score - 86.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_slider_is_pure_performance() {
        let gif = Creative::new("c2", "Loop", CreativeType::Gif, 72.0);
        let scored = score_creative(&gif, 0);
        assert_eq!(scored.carbon_penalty, 0.0);
        assert_eq!(scored.final_score, 72.0);
    }
}
