//! Lending ledger repository for PostgreSQL

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use super::{items::item_not_found, LendingLedger};
use crate::{
    error::{AppError, AppResult},
    models::{Item, LendingEvent, LendingRecord, NewLendingEvent},
};

const RECORD_SELECT: &str = r#"
    SELECT e.id, e.borrower_id, e.item_id, e.lent_at, e.latitude, e.longitude,
           i.id AS i_id, i.title AS i_title, i.author AS i_author,
           i.quantity AS i_quantity, i.created_at AS i_created_at,
           i.updated_at AS i_updated_at
    FROM lending_events e
    LEFT JOIN items i ON i.id = e.item_id
"#;

fn record_from_row(row: &PgRow) -> Result<LendingRecord, sqlx::Error> {
    let event = LendingEvent {
        id: row.try_get("id")?,
        borrower_id: row.try_get("borrower_id")?,
        item_id: row.try_get("item_id")?,
        lent_at: row.try_get("lent_at")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
    };

    // A deleted item leaves every joined column NULL
    let item = match row.try_get::<Option<i32>, _>("i_id")? {
        Some(id) => Some(Item {
            id,
            title: row.try_get("i_title")?,
            author: row.try_get("i_author")?,
            quantity: row.try_get("i_quantity")?,
            created_at: row.try_get("i_created_at")?,
            updated_at: row.try_get("i_updated_at")?,
        }),
        None => None,
    };

    Ok(LendingRecord::new(event, item))
}

#[derive(Clone)]
pub struct LendsRepository {
    pool: Pool<Postgres>,
}

impl LendsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LendingLedger for LendsRepository {
    async fn record_lend(&self, lend: NewLendingEvent) -> AppResult<LendingRecord> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // The conditional decrement takes the row lock and re-checks stock
        // against the latest committed quantity, so one unit is reserved at most once.
        let reserved = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET quantity = quantity - 1, updated_at = $2
            WHERE id = $1 AND quantity > 0
            RETURNING id, title, author, quantity, created_at, updated_at
            "#,
        )
        .bind(lend.item_id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let item = match reserved {
            Some(item) => item,
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM items WHERE id = $1)")
                        .bind(lend.item_id)
                        .fetch_one(&mut *tx)
                        .await?;
                tx.rollback().await?;

                return Err(if exists {
                    AppError::Conflict("Item is out of stock".to_string())
                } else {
                    item_not_found(lend.item_id)
                });
            }
        };

        let event = sqlx::query_as::<_, LendingEvent>(
            r#"
            INSERT INTO lending_events (borrower_id, item_id, lent_at, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, borrower_id, item_id, lent_at, latitude, longitude
            "#,
        )
        .bind(lend.borrower_id)
        .bind(lend.item_id)
        .bind(now)
        .bind(lend.latitude)
        .bind(lend.longitude)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(LendingRecord::new(event, Some(item)))
    }

    async fn list(&self) -> AppResult<Vec<LendingRecord>> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY e.lent_at DESC, e.id DESC",
            RECORD_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    async fn list_by_borrower(&self, borrower_id: i32) -> AppResult<Vec<LendingRecord>> {
        let rows = sqlx::query(&format!(
            "{} WHERE e.borrower_id = $1 ORDER BY e.lent_at DESC, e.id DESC",
            RECORD_SELECT
        ))
        .bind(borrower_id)
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
