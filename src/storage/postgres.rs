use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgListener;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::{Collection, Document, DocumentId, DocumentStore, Subscription};

/// Channel the `documents` row trigger notifies with the collection name.
pub const CHANGE_CHANNEL: &str = "document_changes";

/// Document store on a single Postgres `documents` table (see `migrations/`).
#[derive(Clone)]
pub struct PgDocumentStore {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    fields: Json<serde_json::Value>,
}

impl From<DocumentRow> for Document {
    fn from(r: DocumentRow) -> Self {
        Self {
            id: r.id,
            fields: r.fields.0,
        }
    }
}

impl PgDocumentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

async fn list_documents(db: &PgPool, collection: Collection) -> anyhow::Result<Vec<Document>> {
    let rows = sqlx::query_as::<_, DocumentRow>(
        r#"
        SELECT id, fields
          FROM documents
         WHERE collection = $1
         ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(collection.as_str())
    .fetch_all(db)
    .await
    .with_context(|| format!("list documents in {}", collection))?;

    Ok(rows.into_iter().map(Document::from).collect())
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn subscribe(&self, collection: Collection) -> anyhow::Result<Subscription> {
        // listen before the first read so no change slips between the two
        let mut listener = PgListener::connect_with(&self.db)
            .await
            .context("connect change listener")?;
        listener
            .listen(CHANGE_CHANNEL)
            .await
            .context("listen for document changes")?;

        let (tx, rx) = mpsc::unbounded_channel();
        let initial = list_documents(&self.db, collection).await?;
        tx.send(initial)
            .map_err(|_| anyhow::anyhow!("subscriber dropped before first snapshot"))?;

        let db = self.db.clone();
        let task = tokio::spawn(async move {
            loop {
                let notification = match listener.recv().await {
                    Ok(n) => n,
                    Err(e) => {
                        error!(error = %e, %collection, "change listener failed; subscription closed");
                        break;
                    }
                };
                if notification.payload() != collection.as_str() {
                    continue;
                }
                match list_documents(&db, collection).await {
                    Ok(docs) => {
                        debug!(%collection, docs = docs.len(), "snapshot pushed");
                        if tx.send(docs).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, %collection, "snapshot reload failed"),
                }
            }
        });

        Ok(Subscription::new(rx).with_task(task))
    }

    async fn insert(&self, collection: Collection, fields: serde_json::Value) -> anyhow::Result<DocumentId> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO documents (collection, id, fields)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(collection.as_str())
        .bind(Uuid::new_v4())
        .bind(Json(fields))
        .fetch_one(&self.db)
        .await
        .with_context(|| format!("insert document into {}", collection))?;

        Ok(id)
    }

    async fn replace(&self, collection: Collection, id: DocumentId, fields: serde_json::Value) -> anyhow::Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE documents
               SET fields = $3, updated_at = now()
             WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(fields))
        .execute(&self.db)
        .await
        .with_context(|| format!("replace document {} in {}", id, collection))?;

        anyhow::ensure!(
            res.rows_affected() == 1,
            "document {} not found in {}",
            id,
            collection
        );
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: DocumentId) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM documents
             WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .execute(&self.db)
        .await
        .with_context(|| format!("delete document {} from {}", id, collection))?;

        Ok(())
    }

    async fn list_all(&self, collection: Collection) -> anyhow::Result<Vec<Document>> {
        list_documents(&self.db, collection).await
    }
}

#[cfg(test)]
mod pg_store_tests {
    use super::*;
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;

    async fn connect() -> PgDocumentStore {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let db = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("connect");
        sqlx::migrate!("./migrations").run(&db).await.expect("migrate");
        PgDocumentStore::new(db)
    }

    #[tokio::test]
    #[ignore]
    async fn insert_replace_delete_round_trip() {
        let store = connect().await;
        let id = store
            .insert(Collection::FridgeItems, json!({ "name": "pg-test-milk" }))
            .await
            .expect("insert");
        store
            .replace(Collection::FridgeItems, id, json!({ "name": "pg-test-cream" }))
            .await
            .expect("replace");
        let docs = store.list_all(Collection::FridgeItems).await.expect("list");
        let doc = docs.iter().find(|d| d.id == id).expect("present");
        assert_eq!(doc.fields["name"], "pg-test-cream");

        store.delete(Collection::FridgeItems, id).await.expect("delete");
        let docs = store.list_all(Collection::FridgeItems).await.expect("list");
        assert!(docs.iter().all(|d| d.id != id));
    }

    #[tokio::test]
    #[ignore]
    async fn subscription_sees_inserts() {
        let store = connect().await;
        let mut sub = store.subscribe(Collection::Recipes).await.expect("subscribe");
        let before = sub.next_snapshot().await.expect("initial").len();

        let id = store
            .insert(Collection::Recipes, json!({ "name": "pg-test-stew" }))
            .await
            .expect("insert");
        let after = tokio::time::timeout(std::time::Duration::from_secs(5), sub.next_snapshot())
            .await
            .expect("notified in time")
            .expect("snapshot");
        assert_eq!(after.len(), before + 1);

        store.delete(Collection::Recipes, id).await.expect("cleanup");
    }
}
