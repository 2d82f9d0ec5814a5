//! Document store collaborator.
//!
//! Three collections of JSON documents keyed by id. Every subscriber receives a
//! full snapshot of its collection first and again after each change.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

pub type DocumentId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Ingredients,
    Recipes,
    FridgeItems,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Ingredients,
        Collection::Recipes,
        Collection::FridgeItems,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Ingredients => "ingredients",
            Collection::Recipes => "recipes",
            Collection::FridgeItems => "fridgeItems",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: serde_json::Value,
}

/// Live feed of full collection snapshots. Dropping it stops delivery.
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<Vec<Document>>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<Vec<Document>>) -> Self {
        Self {
            rx,
            task: None,
        }
    }

    pub(crate) fn with_task(mut self, task: JoinHandle<()>) -> Self {
        self.task = Some(task);
        self
    }

    /// Next full snapshot; `None` once the store side has gone away.
    pub async fn next_snapshot(&mut self) -> Option<Vec<Document>> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn subscribe(&self, collection: Collection) -> anyhow::Result<Subscription>;
    async fn insert(&self, collection: Collection, fields: serde_json::Value) -> anyhow::Result<DocumentId>;
    async fn replace(&self, collection: Collection, id: DocumentId, fields: serde_json::Value) -> anyhow::Result<()>;
    async fn delete(&self, collection: Collection, id: DocumentId) -> anyhow::Result<()>;
    async fn list_all(&self, collection: Collection) -> anyhow::Result<Vec<Document>>;
}
