use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One spreadsheet row as read, before any coercion.
///
/// Cells stay raw strings; `services::parse_import_rows` decides what they mean.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    pub name: String,
    pub weight: String,
    pub calories: String,
    pub carbs: String,
    #[serde(default)]
    pub protein: String,
    #[serde(default)]
    pub fat: String,
    #[serde(default)]
    pub avg_shelf_life: String,
    #[serde(default)]
    pub piece_weight: String,
}

/// How a bulk import treats the existing catalog.
///
/// `Replace` deletes every stored ingredient before inserting the imported
/// ones; ingredients missing from the file are lost, and a failure between the
/// two phases leaves the catalog empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportPolicy {
    #[default]
    Merge,
    Replace,
}

impl FromStr for ImportPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "replace" => Ok(Self::Replace),
            other => anyhow::bail!("unknown import policy '{}', expected merge or replace", other),
        }
    }
}

/// A row that did not make it into the catalog, 1-based like a spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub policy: ImportPolicy,
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
    pub failed_writes: usize,
}
