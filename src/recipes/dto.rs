use super::repo_types::{Recipe, RecipeFields, RecipeIngredientLine};
use super::services::aggregate;
use crate::catalog::services::Catalog;
use crate::error::{KitchenError, KitchenResult};
use crate::nutrition::NutritionTotals;
use crate::quantity::{Quantity, QuantityMode};
use crate::storage::DocumentId;

#[derive(Debug, Clone, PartialEq)]
struct DraftLine {
    line: RecipeIngredientLine,
    quantity: Quantity,
}

/// A recipe being composed or edited.
///
/// Lines are rescaled from the catalog whenever their quantity changes; lines
/// left alone keep the snapshot they were loaded with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeDraft {
    pub name: String,
    pub description: String,
    pub image: String,
    pub youtube: String,
    pub instagram: String,
    lines: Vec<DraftLine>,
    editing: Option<DocumentId>,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl RecipeDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Start editing a saved recipe from its stored snapshots.
    pub fn edit(recipe: &Recipe) -> Self {
        let f = &recipe.fields;
        Self {
            name: f.name.clone(),
            description: f.description.clone().unwrap_or_default(),
            image: f.image.clone().unwrap_or_default(),
            youtube: f.youtube.clone().unwrap_or_default(),
            instagram: f.instagram.clone().unwrap_or_default(),
            lines: f
                .ingredients()
                .iter()
                .map(|l| DraftLine {
                    line: l.clone(),
                    quantity: Quantity::grams(l.weight),
                })
                .collect(),
            editing: Some(recipe.id),
        }
    }

    pub fn editing(&self) -> Option<DocumentId> {
        self.editing
    }

    pub fn lines(&self) -> impl Iterator<Item = &RecipeIngredientLine> {
        self.lines.iter().map(|d| &d.line)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity(&self, idx: usize) -> Option<Quantity> {
        self.lines.get(idx).map(|d| d.quantity)
    }

    /// Live total for the lines as they stand.
    pub fn total(&self) -> NutritionTotals {
        let lines: Vec<RecipeIngredientLine> = self.lines().cloned().collect();
        aggregate(&lines)
    }

    /// Append `name` at its reference weight. Returns `false` if already present.
    pub fn add_ingredient(&mut self, catalog: &Catalog, name: &str) -> KitchenResult<bool> {
        if self.lines.iter().any(|d| d.line.name == name) {
            return Ok(false);
        }
        let record = catalog.require(name)?;
        let line = RecipeIngredientLine::scaled(record, record.reference_weight)?;
        self.lines.push(DraftLine {
            quantity: Quantity::grams(line.weight),
            line,
        });
        Ok(true)
    }

    pub fn remove_line(&mut self, idx: usize) -> KitchenResult<RecipeIngredientLine> {
        self.check_index(idx)?;
        Ok(self.lines.remove(idx).line)
    }

    /// Set the quantity of line `idx` in its current mode (grams or pieces).
    pub fn set_value(&mut self, idx: usize, value: f64, catalog: &Catalog) -> KitchenResult<()> {
        self.check_index(idx)?;
        let draft = &self.lines[idx];
        let record = catalog.require(&draft.line.name)?;
        let mut quantity = draft.quantity;
        quantity.set_value(value, record);
        let line = RecipeIngredientLine::scaled(record, quantity.weight())?;
        self.lines[idx] = DraftLine { line, quantity };
        Ok(())
    }

    pub fn switch_mode(&mut self, idx: usize, mode: QuantityMode, catalog: &Catalog) -> KitchenResult<()> {
        self.check_index(idx)?;
        let draft = &self.lines[idx];
        let record = catalog.require(&draft.line.name)?;
        let mut quantity = draft.quantity;
        quantity.switch_mode(mode, record)?;
        let line = RecipeIngredientLine::scaled(record, quantity.weight())?;
        self.lines[idx] = DraftLine { line, quantity };
        Ok(())
    }

    /// Validate and produce the document body to save.
    pub fn finish(&self) -> KitchenResult<RecipeFields> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(KitchenError::IncompleteRecipe("recipe name is empty".into()));
        }
        if self.lines.is_empty() {
            return Err(KitchenError::IncompleteRecipe(format!(
                "recipe '{}' has no ingredients",
                name
            )));
        }
        if let Some(bad) = self
            .lines()
            .find(|l| !(l.weight.is_finite() && l.weight > 0.0))
        {
            return Err(KitchenError::IncompleteRecipe(format!(
                "ingredient '{}' in '{}' has no weight",
                bad.name, name
            )));
        }

        let mut fields = RecipeFields::new(name, self.lines().cloned().collect());
        fields.description = non_empty(&self.description);
        fields.image = non_empty(&self.image);
        fields.youtube = non_empty(&self.youtube);
        fields.instagram = non_empty(&self.instagram);
        Ok(fields)
    }

    fn check_index(&self, idx: usize) -> KitchenResult<()> {
        if idx < self.lines.len() {
            Ok(())
        } else {
            Err(KitchenError::validation(format!(
                "no ingredient line {} (draft has {})",
                idx,
                self.lines.len()
            )))
        }
    }
}
