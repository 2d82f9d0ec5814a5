use std::collections::HashSet;

use super::repo_types::{Recipe, RecipeIngredientLine};
use crate::fridge::repo_types::InventoryItem;
use crate::nutrition::{round_nearest, NutritionTotals};

/// Sum already-scaled lines into a recipe total.
///
/// Weights and nutrition are added as stored (no re-scaling) and each field is
/// rounded once, after summation. Always recompute from the full list.
pub fn aggregate(lines: &[RecipeIngredientLine]) -> NutritionTotals {
    let sum = lines.iter().fold(NutritionTotals::default(), |acc, l| NutritionTotals {
        weight: acc.weight + l.weight,
        calories: acc.calories + l.calories,
        carbs: acc.carbs + l.carbs,
        protein: acc.protein + l.protein,
        fat: acc.fat + l.fat,
    });
    NutritionTotals {
        weight: round_nearest(sum.weight),
        calories: round_nearest(sum.calories),
        carbs: round_nearest(sum.carbs),
        protein: round_nearest(sum.protein),
        fat: round_nearest(sum.fat),
    }
}

/// A recipe can be made when every ingredient name has some fridge item.
///
/// Only presence by name is checked; held weight is not compared with the
/// weight the recipe needs.
pub fn can_make(recipe: &Recipe, inventory: &[InventoryItem]) -> bool {
    let held: HashSet<&str> = inventory.iter().map(|i| i.fields.name.as_str()).collect();
    recipe
        .fields
        .ingredients()
        .iter()
        .all(|line| held.contains(line.name.as_str()))
}

pub fn makeable<'a>(recipes: &'a [Recipe], inventory: &[InventoryItem]) -> Vec<&'a Recipe> {
    recipes.iter().filter(|r| can_make(r, inventory)).collect()
}
