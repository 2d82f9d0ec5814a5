//! In-memory view of the three collections plus the operations that write
//! through to the document store.
//!
//! Every snapshot from the store replaces the local collection wholesale.
//! Writes update local state first and then await the store once; a failed
//! write is logged and reported but not rolled back, so the local view can run
//! ahead of the store until the next snapshot arrives.

use std::path::Path;
use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::{self, Catalog, ImportPolicy, ImportRow, ImportSummary, IngredientRecord};
use crate::error::{KitchenError, KitchenResult};
use crate::fridge::{self, AddFridgeItem, FridgeItemUpdate, InventoryItem};
use crate::recipes::{self, Recipe, RecipeDraft};
use crate::spreadsheet;
use crate::storage::{Collection, Document, DocumentId, DocumentStore, Subscription};

pub struct Kitchen {
    store: Arc<dyn DocumentStore>,
    import_policy: ImportPolicy,
    catalog: Catalog,
    recipes: Vec<Recipe>,
    fridge: Vec<InventoryItem>,
}

/// One live subscription per collection.
pub struct Subscriptions {
    ingredients: Subscription,
    recipes: Subscription,
    fridge_items: Subscription,
}

fn storage_failure(op: &'static str, e: anyhow::Error) -> KitchenError {
    error!(error = %format!("{:#}", e), op, "document store write failed");
    KitchenError::Storage(e)
}

impl Kitchen {
    pub fn new(store: Arc<dyn DocumentStore>, import_policy: ImportPolicy) -> Self {
        Self {
            store,
            import_policy,
            catalog: Catalog::new(),
            recipes: Vec::new(),
            fridge: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn recipe(&self, id: DocumentId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn fridge(&self) -> &[InventoryItem] {
        &self.fridge
    }

    pub fn import_policy(&self) -> ImportPolicy {
        self.import_policy
    }

    pub fn apply_snapshot(&mut self, collection: Collection, docs: Vec<Document>) {
        let received = docs.len();
        match collection {
            Collection::Ingredients => {
                self.catalog = Catalog::from_entries(catalog::repo::decode_snapshot(docs));
                debug!(received, kept = self.catalog.len(), "catalog snapshot applied");
            }
            Collection::Recipes => {
                self.recipes = recipes::repo::decode_snapshot(docs);
                debug!(received, kept = self.recipes.len(), "recipes snapshot applied");
            }
            Collection::FridgeItems => {
                self.fridge = fridge::repo::decode_snapshot(docs);
                debug!(received, kept = self.fridge.len(), "fridge snapshot applied");
            }
        }
    }

    pub async fn subscribe_all(&self) -> KitchenResult<Subscriptions> {
        let subscribe = |c: Collection| async move {
            self.store.subscribe(c).await.map_err(|e| {
                error!(error = %format!("{:#}", e), collection = %c, "subscribe failed");
                KitchenError::Storage(e)
            })
        };
        Ok(Subscriptions {
            ingredients: subscribe(Collection::Ingredients).await?,
            recipes: subscribe(Collection::Recipes).await?,
            fridge_items: subscribe(Collection::FridgeItems).await?,
        })
    }

    /// Wait for the next snapshot on any subscription and apply it.
    ///
    /// Returns the collection that changed, or `None` once a feed has closed.
    pub async fn next_change(&mut self, subs: &mut Subscriptions) -> Option<Collection> {
        let (collection, snapshot) = tokio::select! {
            s = subs.ingredients.next_snapshot() => (Collection::Ingredients, s),
            s = subs.recipes.next_snapshot() => (Collection::Recipes, s),
            s = subs.fridge_items.next_snapshot() => (Collection::FridgeItems, s),
        };
        let Some(docs) = snapshot else {
            warn!(%collection, "subscription closed");
            return None;
        };
        self.apply_snapshot(collection, docs);
        Some(collection)
    }

    pub fn search(&self, term: &str) -> Vec<String> {
        self.catalog.search(term)
    }

    pub fn suggestions(&self, term: &str) -> Vec<String> {
        self.catalog.suggestions(term)
    }

    /// Add or edit an ingredient. An existing name keeps its document id.
    #[instrument(skip(self, record), fields(name = %record.name))]
    pub async fn upsert_ingredient(&mut self, record: IngredientRecord) -> KitchenResult<()> {
        let name = record.name.trim().to_string();
        let existing = self.catalog.upsert(record)?;
        let stored = self.catalog.require(&name)?.clone();
        let store = Arc::clone(&self.store);

        match existing {
            Some(id) => catalog::repo::replace(store.as_ref(), id, &stored)
                .await
                .map_err(|e| storage_failure("replace ingredient", e)),
            None => {
                let id = catalog::repo::insert(store.as_ref(), &stored)
                    .await
                    .map_err(|e| storage_failure("insert ingredient", e))?;
                self.catalog.set_id(&name, id);
                Ok(())
            }
        }
    }

    /// Recipes and fridge items keep their own copies; nothing cascades.
    #[instrument(skip(self))]
    pub async fn remove_ingredient(&mut self, name: &str) -> KitchenResult<()> {
        let entry = self.catalog.remove(name)?;
        let Some(id) = entry.id else {
            return Ok(());
        };
        catalog::repo::delete(self.store.as_ref(), id)
            .await
            .map_err(|e| storage_failure("delete ingredient", e))
    }

    /// Bulk import under the configured policy.
    ///
    /// `Merge` upserts each row by name. `Replace` first deletes every stored
    /// ingredient and then inserts the rows; the two phases are not atomic and
    /// a failure in between leaves the catalog empty.
    #[instrument(skip(self, rows), fields(rows = rows.len(), policy = ?self.import_policy))]
    pub async fn import_rows(&mut self, rows: &[ImportRow]) -> KitchenResult<ImportSummary> {
        let (records, skipped) = catalog::services::parse_import_rows(rows);
        for s in &skipped {
            warn!(row = s.row, reason = %s.reason, "import row skipped");
        }
        let mut summary = ImportSummary {
            policy: self.import_policy,
            skipped,
            ..ImportSummary::default()
        };

        if self.import_policy == ImportPolicy::Replace {
            let deleted = catalog::repo::delete_all(self.store.as_ref())
                .await
                .map_err(|e| storage_failure("delete all ingredients", e))?;
            self.catalog.clear();
            warn!(
                deleted,
                pending = records.len(),
                "catalog emptied, inserting imported ingredients"
            );
        }

        for record in records {
            match self.upsert_ingredient(record).await {
                Ok(()) => summary.imported += 1,
                Err(KitchenError::Storage(_)) => summary.failed_writes += 1,
                Err(e) => return Err(e),
            }
        }

        info!(
            imported = summary.imported,
            skipped = summary.skipped.len(),
            failed_writes = summary.failed_writes,
            "import finished"
        );
        Ok(summary)
    }

    pub async fn import_spreadsheet(&mut self, path: &Path) -> KitchenResult<ImportSummary> {
        let rows = spreadsheet::read_rows_from_path(path)
            .map_err(|e| KitchenError::validation(format!("{:#}", e)))?;
        self.import_rows(&rows).await
    }

    /// Store a finished draft: replaces the recipe it was opened from, or
    /// inserts a new one.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn save_recipe(&mut self, draft: &RecipeDraft) -> KitchenResult<DocumentId> {
        let fields = draft.finish()?;
        let store = Arc::clone(&self.store);

        match draft.editing() {
            Some(id) => {
                let recipe = self
                    .recipes
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or_else(|| KitchenError::not_found(format!("recipe {}", id)))?;
                recipe.fields = fields.clone();
                recipes::repo::replace(store.as_ref(), id, &fields)
                    .await
                    .map_err(|e| storage_failure("replace recipe", e))?;
                Ok(id)
            }
            None => {
                let id = recipes::repo::insert(store.as_ref(), &fields)
                    .await
                    .map_err(|e| storage_failure("insert recipe", e))?;
                self.recipes.push(Recipe { id, fields });
                Ok(id)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_recipe(&mut self, id: DocumentId) -> KitchenResult<()> {
        let idx = self
            .recipes
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| KitchenError::not_found(format!("recipe {}", id)))?;
        self.recipes.remove(idx);
        recipes::repo::delete(self.store.as_ref(), id)
            .await
            .map_err(|e| storage_failure("delete recipe", e))
    }

    pub fn makeable_recipes(&self) -> Vec<&Recipe> {
        recipes::makeable(&self.recipes, &self.fridge)
    }

    #[instrument(skip(self, req), fields(name = %req.name))]
    pub async fn add_fridge_item(&mut self, req: &AddFridgeItem, now: OffsetDateTime) -> KitchenResult<DocumentId> {
        let fields = fridge::services::new_item(&self.catalog, req, now)?;
        let id = fridge::repo::insert(self.store.as_ref(), &fields)
            .await
            .map_err(|e| storage_failure("insert fridge item", e))?;
        self.fridge.push(InventoryItem { id, fields });
        Ok(id)
    }

    #[instrument(skip(self, update))]
    pub async fn update_fridge_item(&mut self, id: DocumentId, update: &FridgeItemUpdate) -> KitchenResult<()> {
        let item = self
            .fridge
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| KitchenError::not_found(format!("fridge item {}", id)))?;
        let fields = fridge::services::apply_update(&item.fields, update)?;
        item.fields = fields.clone();
        fridge::repo::replace(self.store.as_ref(), id, &fields)
            .await
            .map_err(|e| storage_failure("replace fridge item", e))
    }

    #[instrument(skip(self))]
    pub async fn remove_fridge_item(&mut self, id: DocumentId) -> KitchenResult<()> {
        let idx = self
            .fridge
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| KitchenError::not_found(format!("fridge item {}", id)))?;
        self.fridge.remove(idx);
        fridge::repo::delete(self.store.as_ref(), id)
            .await
            .map_err(|e| storage_failure("delete fridge item", e))
    }

    pub fn expiring(&self, days: u32, now: OffsetDateTime) -> Vec<&InventoryItem> {
        fridge::expiring_within(&self.fridge, days, now)
    }
}
