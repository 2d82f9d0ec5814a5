use std::collections::BTreeMap;

use tracing::warn;

use super::dto::{ImportRow, SkippedRow};
use super::repo_types::IngredientRecord;
use crate::error::{KitchenError, KitchenResult};
use crate::storage::DocumentId;

/// A catalog record plus the id of the document backing it, once known.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: Option<DocumentId>,
    pub record: IngredientRecord,
}

/// Ingredient records keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a store snapshot; later duplicates of a name win.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.entries.insert(entry.record.name.clone(), entry);
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Insert or replace by name. Returns the backing document id of the
    /// replaced entry, if there was one.
    pub fn upsert(&mut self, mut record: IngredientRecord) -> KitchenResult<Option<DocumentId>> {
        record.name = record.name.trim().to_string();
        record.validate()?;
        let id = self.entries.get(&record.name).and_then(|e| e.id);
        self.entries
            .insert(record.name.clone(), CatalogEntry { id, record });
        Ok(id)
    }

    pub fn set_id(&mut self, name: &str, id: DocumentId) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.id = Some(id);
        }
    }

    pub fn remove(&mut self, name: &str) -> KitchenResult<CatalogEntry> {
        self.entries
            .remove(name)
            .ok_or_else(|| KitchenError::not_found(format!("ingredient '{}'", name)))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn find(&self, name: &str) -> Option<&IngredientRecord> {
        self.entries.get(name).map(|e| &e.record)
    }

    pub fn require(&self, name: &str) -> KitchenResult<&IngredientRecord> {
        self.find(name)
            .ok_or_else(|| KitchenError::not_found(format!("ingredient '{}'", name)))
    }

    /// Names containing `term`, case-insensitively, in case-insensitive order.
    pub fn search(&self, term: &str) -> Vec<String> {
        let needle = term.to_lowercase();
        let mut names: Vec<String> = self
            .entries
            .keys()
            .filter(|name| name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        names.sort_by_cached_key(|name| (name.to_lowercase(), name.clone()));
        names
    }

    /// Like `search`, but empty when the only match is exactly what the user
    /// already typed, so a completed selection stops suggesting itself.
    pub fn suggestions(&self, term: &str) -> Vec<String> {
        let names = self.search(term);
        match names.as_slice() {
            [only] if only == term => Vec::new(),
            _ => names,
        }
    }
}

/// Coerce a raw cell: blank is 0, unparseable is `None`.
fn coerce_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(0.0);
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Turn raw spreadsheet rows into catalog records.
///
/// Rows without a name or with a blank/zero/unparseable weight are skipped.
/// Other unparseable numbers become 0. Duplicate names keep the last row.
pub fn parse_import_rows(rows: &[ImportRow]) -> (Vec<IngredientRecord>, Vec<SkippedRow>) {
    let mut records: Vec<IngredientRecord> = Vec::new();
    let mut skipped = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let row_no = idx + 1;
        let name = row.name.trim();
        if name.is_empty() {
            skipped.push(SkippedRow {
                row: row_no,
                reason: "missing name".into(),
            });
            continue;
        }
        let weight = match coerce_number(&row.weight) {
            Some(w) if w != 0.0 => w,
            _ => {
                skipped.push(SkippedRow {
                    row: row_no,
                    reason: format!("'{}' has no weight", name),
                });
                continue;
            }
        };

        let number = |field: &str, cell: &str| {
            coerce_number(cell).unwrap_or_else(|| {
                warn!(row = row_no, %name, field, cell, "unparseable number, using 0");
                0.0
            })
        };
        let shelf_life = number("avgShelfLife", &row.avg_shelf_life);
        let piece_weight = number("pieceWeight", &row.piece_weight);

        let record = IngredientRecord {
            name: name.to_string(),
            reference_weight: weight,
            calories: number("calories", &row.calories),
            carbs: number("carbs", &row.carbs),
            protein: number("protein", &row.protein),
            fat: number("fat", &row.fat),
            avg_shelf_life: if shelf_life > 0.0 { shelf_life.round() as u32 } else { 0 },
            piece_weight: (piece_weight > 0.0).then_some(piece_weight),
        };
        if let Err(e) = record.validate() {
            skipped.push(SkippedRow {
                row: row_no,
                reason: e.to_string(),
            });
            continue;
        }

        match records.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    (records, skipped)
}
