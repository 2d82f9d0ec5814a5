pub mod dto;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use dto::RecipeDraft;
pub use repo_types::{Recipe, RecipeFields, RecipeIngredientLine};
pub use services::{aggregate, can_make, makeable};
