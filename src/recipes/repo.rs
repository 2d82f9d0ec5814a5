use anyhow::Context;
use tracing::warn;

use super::repo_types::{Recipe, RecipeFields};
use crate::storage::{Collection, Document, DocumentId, DocumentStore};

const COLLECTION: Collection = Collection::Recipes;

/// Decode a `recipes` snapshot, recomputing every total from its lines.
pub fn decode_snapshot(docs: Vec<Document>) -> Vec<Recipe> {
    docs.into_iter()
        .filter_map(|doc| match serde_json::from_value::<RecipeFields>(doc.fields) {
            Ok(mut fields) => {
                fields.recompute_total();
                Some(Recipe { id: doc.id, fields })
            }
            Err(e) => {
                warn!(error = %e, id = %doc.id, "malformed recipe document skipped");
                None
            }
        })
        .collect()
}

pub async fn insert(store: &dyn DocumentStore, fields: &RecipeFields) -> anyhow::Result<DocumentId> {
    let value = serde_json::to_value(fields).context("encode recipe")?;
    store.insert(COLLECTION, value).await
}

pub async fn replace(store: &dyn DocumentStore, id: DocumentId, fields: &RecipeFields) -> anyhow::Result<()> {
    let value = serde_json::to_value(fields).context("encode recipe")?;
    store.replace(COLLECTION, id, value).await
}

pub async fn delete(store: &dyn DocumentStore, id: DocumentId) -> anyhow::Result<()> {
    store.delete(COLLECTION, id).await
}

#[cfg(test)]
mod repo_tests {
    use super::*;
    use crate::recipes::repo_types::RecipeIngredientLine;
    use crate::nutrition::NutritionAmounts;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn decode_recomputes_totals_and_skips_garbage() {
        let docs = vec![
            Document {
                id: Uuid::new_v4(),
                fields: json!({
                    "name": "stew",
                    "ingredients": [
                        { "name": "onion", "weight": 150, "calories": 60, "carbs": 14, "protein": 2, "fat": 0 },
                        { "name": "tofu", "weight": 200, "calories": 90, "carbs": 3, "protein": 12, "fat": 5 }
                    ],
                    "total": { "weight": 350, "calories": 1.5, "carbs": 0.17, "protein": 0.14, "fat": 0.05 }
                }),
            },
            Document {
                id: Uuid::new_v4(),
                fields: json!({ "ingredients": "nope" }),
            },
        ];
        let recipes = decode_snapshot(docs);
        assert_eq!(recipes.len(), 1);
        let total = recipes[0].fields.total();
        assert_eq!(total.calories, 150.0);
        assert_eq!(total.carbs, 17.0);
        assert_eq!(total.protein, 14.0);
        assert_eq!(total.fat, 5.0);
    }

    #[tokio::test]
    async fn stored_document_round_trips() {
        let store = MemoryStore::new();
        let mut fields = RecipeFields::new(
            "tofu bowl",
            vec![RecipeIngredientLine::from_amounts(
                "tofu",
                200.0,
                NutritionAmounts {
                    calories: 90.0,
                    carbs: 3.0,
                    protein: 12.0,
                    fat: 5.0,
                },
            )],
        );
        fields.instagram = Some("@bowls".into());
        let id = insert(&store, &fields).await.expect("insert");

        let docs = store.list_all(COLLECTION).await.expect("list");
        assert_eq!(docs[0].fields["total"]["calories"], json!(90.0));
        assert!(docs[0].fields.get("description").is_none());

        let recipes = decode_snapshot(docs);
        assert_eq!(recipes[0].id, id);
        assert_eq!(recipes[0].fields, fields);
    }
}
