use serde::{Deserialize, Serialize};

use crate::error::{KitchenError, KitchenResult};

/// Catalog entry: nutrition per `reference_weight` grams, keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRecord {
    pub name: String,
    #[serde(rename = "weight")]
    pub reference_weight: f64, // grams, scaling denominator
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub avg_shelf_life: u32, // days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piece_weight: Option<f64>, // grams per piece
}

impl IngredientRecord {
    pub fn new(name: impl Into<String>, reference_weight: f64) -> Self {
        Self {
            name: name.into(),
            reference_weight,
            calories: 0.0,
            carbs: 0.0,
            protein: 0.0,
            fat: 0.0,
            avg_shelf_life: 0,
            piece_weight: None,
        }
    }

    pub fn with_nutrition(mut self, calories: f64, carbs: f64, protein: f64, fat: f64) -> Self {
        self.calories = calories;
        self.carbs = carbs;
        self.protein = protein;
        self.fat = fat;
        self
    }

    pub fn with_shelf_life(mut self, days: u32) -> Self {
        self.avg_shelf_life = days;
        self
    }

    pub fn with_piece_weight(mut self, grams: f64) -> Self {
        self.piece_weight = Some(grams);
        self
    }

    /// Piece weight if it can drive count-based entry (present and positive).
    pub fn usable_piece_weight(&self) -> Option<f64> {
        self.piece_weight.filter(|w| w.is_finite() && *w > 0.0)
    }

    pub fn validate(&self) -> KitchenResult<()> {
        if self.name.trim().is_empty() {
            return Err(KitchenError::validation("ingredient name must not be empty"));
        }
        if !(self.reference_weight.is_finite() && self.reference_weight > 0.0) {
            return Err(KitchenError::validation(format!(
                "reference weight of '{}' must be positive, got {}",
                self.name, self.reference_weight
            )));
        }
        for (field, value) in [
            ("calories", self.calories),
            ("carbs", self.carbs),
            ("protein", self.protein),
            ("fat", self.fat),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(KitchenError::validation(format!(
                    "{} of '{}' must be a non-negative number, got {}",
                    field, self.name, value
                )));
            }
        }
        Ok(())
    }
}
