use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use super::{Collection, Document, DocumentId, DocumentStore, Subscription};

/// In-process document store with the same snapshot semantics as Postgres.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    docs: HashMap<Collection, Vec<Document>>,
    subscribers: HashMap<Collection, Vec<mpsc::UnboundedSender<Vec<Document>>>>,
}

impl Inner {
    fn snapshot(&self, collection: Collection) -> Vec<Document> {
        self.docs.get(&collection).cloned().unwrap_or_default()
    }

    fn notify(&mut self, collection: Collection) {
        let snapshot = self.snapshot(collection);
        if let Some(subs) = self.subscribers.get_mut(&collection) {
            subs.retain(|tx| tx.send(snapshot.clone()).is_ok());
            debug!(%collection, subscribers = subs.len(), docs = snapshot.len(), "snapshot pushed");
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn subscribe(&self, collection: Collection) -> anyhow::Result<Subscription> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        tx.send(inner.snapshot(collection))
            .map_err(|_| anyhow::anyhow!("subscriber dropped before first snapshot"))?;
        inner.subscribers.entry(collection).or_default().push(tx);
        Ok(Subscription::new(rx))
    }

    async fn insert(&self, collection: Collection, fields: serde_json::Value) -> anyhow::Result<DocumentId> {
        let id = Uuid::new_v4();
        let mut inner = self.lock();
        inner
            .docs
            .entry(collection)
            .or_default()
            .push(Document { id, fields });
        inner.notify(collection);
        Ok(id)
    }

    async fn replace(&self, collection: Collection, id: DocumentId, fields: serde_json::Value) -> anyhow::Result<()> {
        let mut inner = self.lock();
        let doc = inner
            .docs
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| anyhow::anyhow!("document {} not found in {}", id, collection))?;
        doc.fields = fields;
        inner.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: DocumentId) -> anyhow::Result<()> {
        let mut inner = self.lock();
        if let Some(docs) = inner.docs.get_mut(&collection) {
            docs.retain(|d| d.id != id);
        }
        inner.notify(collection);
        Ok(())
    }

    async fn list_all(&self, collection: Collection) -> anyhow::Result<Vec<Document>> {
        Ok(self.lock().snapshot(collection))
    }
}

#[cfg(test)]
mod memory_store_tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn subscribe_delivers_initial_and_change_snapshots() {
        let store = MemoryStore::new();
        let first = store
            .insert(Collection::Ingredients, json!({ "name": "onion" }))
            .await
            .expect("insert");

        let mut sub = store.subscribe(Collection::Ingredients).await.expect("subscribe");
        let initial = sub.next_snapshot().await.expect("initial snapshot");
        assert_eq!(initial.len(), 1);
        assert_eq!(initial[0].id, first);

        store
            .insert(Collection::Ingredients, json!({ "name": "tofu" }))
            .await
            .expect("insert");
        let next = sub.next_snapshot().await.expect("change snapshot");
        assert_eq!(next.len(), 2);
        assert_eq!(next[1].fields["name"], "tofu");
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = MemoryStore::new();
        store
            .insert(Collection::Recipes, json!({ "name": "stew" }))
            .await
            .expect("insert");
        assert!(store.list_all(Collection::Ingredients).await.expect("list").is_empty());
        assert_eq!(store.list_all(Collection::Recipes).await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn replace_and_delete() {
        let store = MemoryStore::new();
        let id = store
            .insert(Collection::FridgeItems, json!({ "name": "milk" }))
            .await
            .expect("insert");
        store
            .replace(Collection::FridgeItems, id, json!({ "name": "oat milk" }))
            .await
            .expect("replace");
        let docs = store.list_all(Collection::FridgeItems).await.expect("list");
        assert_eq!(docs[0].fields["name"], "oat milk");

        store.delete(Collection::FridgeItems, id).await.expect("delete");
        assert!(store.list_all(Collection::FridgeItems).await.expect("list").is_empty());
        // deleting twice is fine
        store.delete(Collection::FridgeItems, id).await.expect("delete again");
    }

    #[tokio::test]
    async fn replace_missing_document_fails() {
        let store = MemoryStore::new();
        let err = store
            .replace(Collection::Recipes, Uuid::new_v4(), json!({}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn dropped_subscribers_are_pruned() {
        let store = MemoryStore::new();
        let sub = store.subscribe(Collection::Recipes).await.expect("subscribe");
        drop(sub);
        store
            .insert(Collection::Recipes, json!({ "name": "soup" }))
            .await
            .expect("insert still succeeds");
    }
}
