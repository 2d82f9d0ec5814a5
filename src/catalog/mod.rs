pub mod dto;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use dto::{ImportPolicy, ImportRow, ImportSummary, SkippedRow};
pub use repo_types::IngredientRecord;
pub use services::{Catalog, CatalogEntry};
