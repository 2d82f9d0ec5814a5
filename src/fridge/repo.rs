use anyhow::Context;
use tracing::warn;

use super::repo_types::{InventoryFields, InventoryItem};
use crate::storage::{Collection, Document, DocumentId, DocumentStore};

const COLLECTION: Collection = Collection::FridgeItems;

pub fn decode_snapshot(docs: Vec<Document>) -> Vec<InventoryItem> {
    docs.into_iter()
        .filter_map(|doc| match serde_json::from_value::<InventoryFields>(doc.fields) {
            Ok(fields) => Some(InventoryItem { id: doc.id, fields }),
            Err(e) => {
                warn!(error = %e, id = %doc.id, "malformed fridge item skipped");
                None
            }
        })
        .collect()
}

pub async fn insert(store: &dyn DocumentStore, fields: &InventoryFields) -> anyhow::Result<DocumentId> {
    let value = serde_json::to_value(fields).context("encode fridge item")?;
    store.insert(COLLECTION, value).await
}

pub async fn replace(store: &dyn DocumentStore, id: DocumentId, fields: &InventoryFields) -> anyhow::Result<()> {
    let value = serde_json::to_value(fields).context("encode fridge item")?;
    store.replace(COLLECTION, id, value).await
}

pub async fn delete(store: &dyn DocumentStore, id: DocumentId) -> anyhow::Result<()> {
    store.delete(COLLECTION, id).await
}

#[cfg(test)]
mod repo_tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn decode_skips_items_with_bad_dates() {
        let ok = Uuid::new_v4();
        let docs = vec![
            Document {
                id: ok,
                fields: json!({
                    "name": "milk",
                    "weight": 1000,
                    "addedDate": "2026-10-10T08:00:00Z",
                    "expirationDate": "2026-10-20T08:00:00+09:00"
                }),
            },
            Document {
                id: Uuid::new_v4(),
                fields: json!({
                    "name": "eggs",
                    "weight": 600,
                    "addedDate": "yesterday",
                    "expirationDate": "2026-10-20T08:00:00Z"
                }),
            },
        ];
        let items = decode_snapshot(docs);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, ok);
        assert_eq!(items[0].fields.weight, 1000.0);
    }
}
