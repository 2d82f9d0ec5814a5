use anyhow::Context;
use tracing::warn;

use super::repo_types::IngredientRecord;
use super::services::CatalogEntry;
use crate::storage::{Collection, Document, DocumentId, DocumentStore};

const COLLECTION: Collection = Collection::Ingredients;

/// Decode an `ingredients` snapshot. Nameless or invalid documents are skipped.
pub fn decode_snapshot(docs: Vec<Document>) -> Vec<CatalogEntry> {
    docs.into_iter()
        .filter_map(|doc| {
            let record: IngredientRecord = match serde_json::from_value(doc.fields) {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, id = %doc.id, "malformed ingredient document skipped");
                    return None;
                }
            };
            if record.name.trim().is_empty() {
                return None;
            }
            if let Err(e) = record.validate() {
                warn!(error = %e, id = %doc.id, "invalid ingredient document skipped");
                return None;
            }
            Some(CatalogEntry {
                id: Some(doc.id),
                record,
            })
        })
        .collect()
}

pub async fn insert(store: &dyn DocumentStore, record: &IngredientRecord) -> anyhow::Result<DocumentId> {
    let fields = serde_json::to_value(record).context("encode ingredient")?;
    store.insert(COLLECTION, fields).await
}

pub async fn replace(store: &dyn DocumentStore, id: DocumentId, record: &IngredientRecord) -> anyhow::Result<()> {
    let fields = serde_json::to_value(record).context("encode ingredient")?;
    store.replace(COLLECTION, id, fields).await
}

pub async fn delete(store: &dyn DocumentStore, id: DocumentId) -> anyhow::Result<()> {
    store.delete(COLLECTION, id).await
}

/// First phase of a replacing import: remove every stored ingredient.
pub async fn delete_all(store: &dyn DocumentStore) -> anyhow::Result<usize> {
    let docs = store.list_all(COLLECTION).await.context("list ingredients")?;
    let count = docs.len();
    for doc in docs {
        store
            .delete(COLLECTION, doc.id)
            .await
            .with_context(|| format!("delete ingredient {}", doc.id))?;
    }
    Ok(count)
}

#[cfg(test)]
mod repo_tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn decode_skips_nameless_and_invalid_docs() {
        let docs = vec![
            Document {
                id: Uuid::new_v4(),
                fields: json!({ "name": "onion", "weight": 100, "calories": 40 }),
            },
            Document {
                id: Uuid::new_v4(),
                fields: json!({ "name": "", "weight": 100 }),
            },
            Document {
                id: Uuid::new_v4(),
                fields: json!({ "name": "broken", "weight": 0 }),
            },
            Document {
                id: Uuid::new_v4(),
                fields: json!({ "weight": "heavy" }),
            },
        ];
        let entries = decode_snapshot(docs);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].record.name, "onion");
        assert_eq!(entries[0].record.calories, 40.0);
    }

    #[tokio::test]
    async fn delete_all_empties_collection() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            insert(&store, &IngredientRecord::new(name, 100.0))
                .await
                .expect("insert");
        }
        assert_eq!(delete_all(&store).await.expect("delete all"), 3);
        assert!(store.list_all(COLLECTION).await.expect("list").is_empty());
    }
}
