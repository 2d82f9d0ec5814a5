//! Proportional nutrition scaling.
//!
//! Catalog values are "per reference weight"; every amount stored on a recipe
//! line is already scaled to that line's weight and rounded to an integer.

use serde::{Deserialize, Serialize};

use crate::catalog::repo_types::IngredientRecord;
use crate::error::{KitchenError, KitchenResult};

/// Scaled calories/carbs/protein/fat for one usage weight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionAmounts {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

/// Recipe total: summed weight plus summed nutrition, each rounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub weight: f64,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

/// Nearest integer, halves away from zero (13.5 -> 14, -1.5 -> -2).
pub fn round_nearest(value: f64) -> f64 {
    value.round()
}

/// Scale `record` to `target_weight` grams.
///
/// Non-positive target weights are not rejected here so that legacy lines can
/// still be recomputed; new lines are validated by the recipe draft.
pub fn scale(record: &IngredientRecord, target_weight: f64) -> KitchenResult<NutritionAmounts> {
    if !(record.reference_weight.is_finite() && record.reference_weight > 0.0) {
        return Err(KitchenError::InvariantViolation(format!(
            "ingredient '{}' has reference weight {}",
            record.name, record.reference_weight
        )));
    }
    let ratio = target_weight / record.reference_weight;
    Ok(NutritionAmounts {
        calories: round_nearest(record.calories * ratio),
        carbs: round_nearest(record.carbs * ratio),
        protein: round_nearest(record.protein * ratio),
        fat: round_nearest(record.fat * ratio),
    })
}

#[cfg(test)]
mod scale_tests {
    use super::*;

    fn onion() -> IngredientRecord {
        IngredientRecord::new("onion", 100.0).with_nutrition(40.0, 9.0, 1.0, 0.0)
    }

    #[test]
    fn onion_scaled_to_150g() {
        let scaled = scale(&onion(), 150.0).expect("scale");
        assert_eq!(
            scaled,
            NutritionAmounts {
                calories: 60.0,
                carbs: 14.0,
                protein: 2.0,
                fat: 0.0
            }
        );
    }

    #[test]
    fn reference_weight_is_identity() {
        let rec = IngredientRecord::new("tofu", 150.0).with_nutrition(126.4, 3.2, 12.5, 7.5);
        let scaled = scale(&rec, 150.0).expect("scale");
        assert_eq!(scaled.calories, 126.0);
        assert_eq!(scaled.carbs, 3.0);
        assert_eq!(scaled.protein, 13.0);
        assert_eq!(scaled.fat, 8.0);
    }

    #[test]
    fn matches_formula_for_many_weights() {
        let rec = IngredientRecord::new("rice", 80.0).with_nutrition(285.0, 62.0, 5.4, 0.5);
        for w in [1.0, 7.5, 33.0, 80.0, 120.0, 999.0] {
            let ratio: f64 = w / 80.0;
            let scaled = scale(&rec, w).expect("scale");
            assert_eq!(scaled.calories, (285.0 * ratio).round());
            assert_eq!(scaled.carbs, (62.0 * ratio).round());
            assert_eq!(scaled.protein, (5.4 * ratio).round());
            assert_eq!(scaled.fat, (0.5 * ratio).round());
        }
    }

    #[test]
    fn zero_reference_weight_is_invariant_violation() {
        let mut rec = onion();
        rec.reference_weight = 0.0;
        assert!(matches!(
            scale(&rec, 100.0),
            Err(KitchenError::InvariantViolation(_))
        ));
    }

    #[test]
    fn non_positive_target_is_tolerated() {
        assert_eq!(scale(&onion(), 0.0).expect("scale"), NutritionAmounts::default());
        let neg = scale(&onion(), -50.0).expect("scale");
        assert_eq!(neg.calories, -20.0);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_nearest(13.5), 14.0);
        assert_eq!(round_nearest(1.5), 2.0);
        assert_eq!(round_nearest(2.5), 3.0);
        assert_eq!(round_nearest(-2.5), -3.0);
        assert_eq!(round_nearest(2.49), 2.0);
    }
}
