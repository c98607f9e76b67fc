//! Catalog management service

use crate::{
    error::AppResult,
    models::item::{CreateItem, Item, UpdateItem},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List every item in the catalog
    pub async fn list_items(&self) -> AppResult<Vec<Item>> {
        self.repository.items.list().await
    }

    /// Get item by ID
    pub async fn get_item(&self, id: i32) -> AppResult<Item> {
        self.repository.items.get(id).await
    }

    /// Validate and persist a new item
    pub async fn create_item(&self, request: CreateItem) -> AppResult<Item> {
        let item = request.validate()?;
        let created = self.repository.items.create(item).await?;

        tracing::info!(
            item_id = created.id,
            quantity = created.quantity,
            "Catalog item created"
        );
        Ok(created)
    }

    /// Update the fields present in `request`, leaving the others as stored
    pub async fn update_item(&self, id: i32, request: UpdateItem) -> AppResult<Item> {
        // Existence is reported before any field error
        let current = self.repository.items.get(id).await?;
        let changes = request.validate()?;
        if changes.is_empty() {
            return Ok(current);
        }

        let updated = self.repository.items.update(id, changes).await?;
        tracing::info!(item_id = id, "Catalog item updated");
        Ok(updated)
    }

    /// Delete an item. Lending history referencing it is kept.
    pub async fn delete_item(&self, id: i32) -> AppResult<Item> {
        let removed = self.repository.items.delete(id).await?;
        tracing::info!(item_id = id, "Catalog item deleted");
        Ok(removed)
    }
}
