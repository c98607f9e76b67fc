//! Process-local store implementing both the catalog and the ledger.
//!
//! Each item lives in its own slot behind its own mutex. A lend holds the
//! slot lock across the stock check, the decrement and the ledger append, so
//! lends of one item are serialized while lends of different items proceed
//! independently. Lock order is always slot, then ledger.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicI32, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use super::{items::item_not_found, CatalogStore, LendingLedger};
use crate::{
    error::{AppError, AppResult},
    models::{Item, ItemChanges, LendingEvent, LendingRecord, NewItem, NewLendingEvent},
};

/// `None` once the item has been deleted
type ItemSlot = Arc<Mutex<Option<Item>>>;

#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<BTreeMap<i32, ItemSlot>>,
    events: Mutex<Vec<LendingEvent>>,
    next_item_id: AtomicI32,
    next_event_id: AtomicI32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, id: i32) -> AppResult<ItemSlot> {
        self.items
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| item_not_found(id))
    }

    async fn snapshot(&self, id: i32) -> Option<Item> {
        let slot = self.items.read().await.get(&id).cloned()?;
        let item = slot.lock().await.clone();
        item
    }

    async fn join(&self, mut events: Vec<LendingEvent>) -> Vec<LendingRecord> {
        events.sort_by(|a, b| b.lent_at.cmp(&a.lent_at).then(b.id.cmp(&a.id)));

        let mut records = Vec::with_capacity(events.len());
        for event in events {
            let item = self.snapshot(event.item_id).await;
            records.push(LendingRecord::new(event, item));
        }
        records
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Item>> {
        let slots: Vec<ItemSlot> = self.items.read().await.values().cloned().collect();

        let mut items = Vec::with_capacity(slots.len());
        for slot in slots {
            if let Some(item) = slot.lock().await.clone() {
                items.push(item);
            }
        }
        Ok(items)
    }

    async fn get(&self, id: i32) -> AppResult<Item> {
        self.snapshot(id).await.ok_or_else(|| item_not_found(id))
    }

    async fn create(&self, item: NewItem) -> AppResult<Item> {
        let now = Utc::now();
        let id = self.next_item_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = Item {
            id,
            title: item.title,
            author: item.author,
            quantity: item.quantity,
            created_at: now,
            updated_at: now,
        };

        self.items
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(Some(created.clone()))));
        Ok(created)
    }

    async fn update(&self, id: i32, changes: ItemChanges) -> AppResult<Item> {
        let slot = self.slot(id).await?;
        let mut guard = slot.lock().await;
        let item = guard.as_mut().ok_or_else(|| item_not_found(id))?;

        changes.apply_to(item, Utc::now());
        Ok(item.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<Item> {
        let slot = self
            .items
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| item_not_found(id))?;

        // Only the caller that removed the slot from the map reaches here
        let removed = slot.lock().await.take();
        removed.ok_or_else(|| AppError::Internal(format!("Item slot {} was already empty", id)))
    }
}

#[async_trait]
impl LendingLedger for MemoryStore {
    async fn record_lend(&self, lend: NewLendingEvent) -> AppResult<LendingRecord> {
        let slot = self.slot(lend.item_id).await?;
        let mut guard = slot.lock().await;
        let item = guard.as_mut().ok_or_else(|| item_not_found(lend.item_id))?;

        if item.quantity <= 0 {
            return Err(AppError::Conflict("Item is out of stock".to_string()));
        }

        let now = Utc::now();
        item.quantity -= 1;
        item.updated_at = now;

        let event = LendingEvent {
            id: self.next_event_id.fetch_add(1, Ordering::SeqCst) + 1,
            borrower_id: lend.borrower_id,
            item_id: lend.item_id,
            lent_at: now,
            latitude: lend.latitude,
            longitude: lend.longitude,
        };
        self.events.lock().await.push(event.clone());

        Ok(LendingRecord::new(event, Some(item.clone())))
    }

    async fn list(&self) -> AppResult<Vec<LendingRecord>> {
        let events = self.events.lock().await.clone();
        Ok(self.join(events).await)
    }

    async fn list_by_borrower(&self, borrower_id: i32) -> AppResult<Vec<LendingRecord>> {
        let events: Vec<LendingEvent> = self
            .events
            .lock()
            .await
            .iter()
            .filter(|e| e.borrower_id == borrower_id)
            .cloned()
            .collect();
        Ok(self.join(events).await)
    }
}
