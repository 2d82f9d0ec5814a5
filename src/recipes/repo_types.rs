use serde::{Deserialize, Serialize};

use super::services::aggregate;
use crate::catalog::repo_types::IngredientRecord;
use crate::error::{KitchenError, KitchenResult};
use crate::nutrition::{scale, NutritionAmounts, NutritionTotals};
use crate::storage::DocumentId;

/// Detached copy of an ingredient at the weight it is used in a recipe.
///
/// Nutrition values are already scaled to `weight`; later catalog edits never
/// touch them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredientLine {
    pub name: String,
    pub weight: f64, // grams used
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
}

impl RecipeIngredientLine {
    /// Snapshot `record` scaled to `weight`. New lines must weigh something.
    pub fn scaled(record: &IngredientRecord, weight: f64) -> KitchenResult<Self> {
        if !(weight.is_finite() && weight > 0.0) {
            return Err(KitchenError::validation(format!(
                "weight of '{}' must be positive, got {}",
                record.name, weight
            )));
        }
        let amounts = scale(record, weight)?;
        Ok(Self::from_amounts(record.name.clone(), weight, amounts))
    }

    pub fn from_amounts(name: impl Into<String>, weight: f64, amounts: NutritionAmounts) -> Self {
        Self {
            name: name.into(),
            weight,
            calories: amounts.calories,
            carbs: amounts.carbs,
            protein: amounts.protein,
            fat: amounts.fat,
        }
    }
}

/// The stored body of a recipe document.
///
/// `total` is derived from `ingredients` and only ever set by recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeFields {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default)]
    ingredients: Vec<RecipeIngredientLine>,
    #[serde(default)]
    total: NutritionTotals,
}

impl RecipeFields {
    pub fn new(name: impl Into<String>, ingredients: Vec<RecipeIngredientLine>) -> Self {
        let total = aggregate(&ingredients);
        Self {
            name: name.into(),
            description: None,
            image: None,
            youtube: None,
            instagram: None,
            ingredients,
            total,
        }
    }

    pub fn ingredients(&self) -> &[RecipeIngredientLine] {
        &self.ingredients
    }

    pub fn total(&self) -> NutritionTotals {
        self.total
    }

    pub fn set_ingredients(&mut self, ingredients: Vec<RecipeIngredientLine>) {
        self.ingredients = ingredients;
        self.recompute_total();
    }

    /// Re-derive `total` from the lines, discarding whatever was stored.
    pub fn recompute_total(&mut self) {
        self.total = aggregate(&self.ingredients);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: DocumentId,
    pub fields: RecipeFields,
}
