//! Mass vs. piece-count entry for recipe lines.
//!
//! Both modes are views onto one absolute gram weight; the count is always
//! derived from it, never stored.

use serde::{Deserialize, Serialize};

use crate::catalog::repo_types::IngredientRecord;
use crate::error::{KitchenError, KitchenResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityMode {
    #[default]
    Mass,
    Count,
}

/// Grams represented by one counted unit of `record`.
///
/// Falls back to the reference weight when no usable piece weight exists.
pub fn unit_weight(record: &IngredientRecord) -> f64 {
    record
        .usable_piece_weight()
        .unwrap_or(record.reference_weight)
}

/// Whether count entry is offered for this ingredient.
pub fn count_available(record: &IngredientRecord) -> bool {
    record.usable_piece_weight().is_some()
}

/// Absolute grams for a user-entered `value` in `mode`.
pub fn resolve(mode: QuantityMode, value: f64, record: &IngredientRecord) -> f64 {
    match mode {
        QuantityMode::Mass => value,
        QuantityMode::Count => value * unit_weight(record),
    }
}

/// One line's quantity: the entry mode plus the underlying absolute weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    mode: QuantityMode,
    weight: f64, // grams
}

impl Quantity {
    pub fn grams(weight: f64) -> Self {
        Self {
            mode: QuantityMode::Mass,
            weight,
        }
    }

    pub fn pieces(count: f64, record: &IngredientRecord) -> KitchenResult<Self> {
        ensure_count_available(record)?;
        Ok(Self {
            mode: QuantityMode::Count,
            weight: resolve(QuantityMode::Count, count, record),
        })
    }

    pub fn mode(&self) -> QuantityMode {
        self.mode
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The value shown to the user in the current mode.
    pub fn display_value(&self, record: &IngredientRecord) -> f64 {
        match self.mode {
            QuantityMode::Mass => self.weight,
            QuantityMode::Count => self.weight / unit_weight(record),
        }
    }

    /// Apply a user edit expressed in the current mode.
    pub fn set_value(&mut self, value: f64, record: &IngredientRecord) {
        self.weight = resolve(self.mode, value, record);
    }

    /// Switch entry mode. The weight stays put; only its displayed view changes.
    pub fn switch_mode(&mut self, mode: QuantityMode, record: &IngredientRecord) -> KitchenResult<()> {
        if mode == QuantityMode::Count {
            ensure_count_available(record)?;
        }
        self.mode = mode;
        Ok(())
    }
}

fn ensure_count_available(record: &IngredientRecord) -> KitchenResult<()> {
    if count_available(record) {
        Ok(())
    } else {
        Err(KitchenError::validation(format!(
            "'{}' has no piece weight; count entry is unavailable",
            record.name
        )))
    }
}
