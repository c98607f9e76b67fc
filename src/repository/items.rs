//! Items repository for PostgreSQL

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use super::CatalogStore;
use crate::{
    error::{AppError, AppResult},
    models::{Item, ItemChanges, NewItem},
};

const ITEM_COLUMNS: &str = "id, title, author, quantity, created_at, updated_at";

pub(crate) fn item_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Item with id {} not found", id))
}

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for ItemsRepository {
    async fn list(&self) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items ORDER BY id",
            ITEM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn get(&self, id: i32) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(&format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| item_not_found(id))
    }

    async fn create(&self, item: NewItem) -> AppResult<Item> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO items (title, author, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(&item.title)
        .bind(&item.author)
        .bind(item.quantity)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i32, changes: ItemChanges) -> AppResult<Item> {
        // COALESCE keeps the stored value for every absent field
        sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE items
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                quantity = COALESCE($4, quantity),
                updated_at = $5
            WHERE id = $1
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.author)
        .bind(changes.quantity)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| item_not_found(id))
    }

    async fn delete(&self, id: i32) -> AppResult<Item> {
        // Lending events keep their item_id; there is no cascade
        sqlx::query_as::<_, Item>(&format!(
            "DELETE FROM items WHERE id = $1 RETURNING {}",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| item_not_found(id))
    }
}
