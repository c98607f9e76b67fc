//! Repository layer: store traits and their backends

pub mod items;
pub mod lends;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Item, ItemChanges, LendingRecord, NewItem, NewLendingEvent},
};

/// Store of record for catalog items
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Item>>;

    /// Fails with `NotFound` when the id is unknown
    async fn get(&self, id: i32) -> AppResult<Item>;

    async fn create(&self, item: NewItem) -> AppResult<Item>;

    /// Merge `changes` into the stored item. Fails with `NotFound` when the id is unknown.
    async fn update(&self, id: i32, changes: ItemChanges) -> AppResult<Item>;

    /// Remove the item regardless of lending history and return the removed snapshot
    async fn delete(&self, id: i32) -> AppResult<Item>;
}

/// Append-only ledger of lending events
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LendingLedger: Send + Sync {
    /// Reserve one unit of the item and append the event, as one atomic step.
    ///
    /// Fails with `NotFound` when the item does not exist and with `Conflict`
    /// when its quantity is zero; neither the quantity nor the ledger changes
    /// in that case. Calls for the same item are serialized, calls for
    /// different items are not.
    async fn record_lend(&self, lend: NewLendingEvent) -> AppResult<LendingRecord>;

    /// All events, newest first
    async fn list(&self) -> AppResult<Vec<LendingRecord>>;

    /// Events of one borrower, newest first
    async fn list_by_borrower(&self, borrower_id: i32) -> AppResult<Vec<LendingRecord>>;
}

/// Store handles shared by the services
#[derive(Clone)]
pub struct Repository {
    pub items: Arc<dyn CatalogStore>,
    pub lends: Arc<dyn LendingLedger>,
}

impl Repository {
    /// Create a repository backed by PostgreSQL
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            items: Arc::new(items::ItemsRepository::new(pool.clone())),
            lends: Arc::new(lends::LendsRepository::new(pool)),
        }
    }

    /// Create a repository backed by a process-local store
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::new());
        Self {
            items: store.clone(),
            lends: store,
        }
    }

    /// Assemble a repository from arbitrary store implementations
    pub fn from_parts(items: Arc<dyn CatalogStore>, lends: Arc<dyn LendingLedger>) -> Self {
        Self { items, lends }
    }
}
