//! Lending ledger model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{coerce_number, item::Item};
use crate::error::{AppError, AppResult};

/// One unit of an item lent to a borrower. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LendingEvent {
    pub id: i32,
    pub borrower_id: i32,
    pub item_id: i32,
    pub lent_at: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Lending event joined with the item it references.
///
/// `item` is `None` once the item has been deleted from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LendingRecord {
    pub id: i32,
    pub borrower_id: i32,
    pub item_id: i32,
    pub lent_at: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub item: Option<Item>,
}

impl LendingRecord {
    pub fn new(event: LendingEvent, item: Option<Item>) -> Self {
        Self {
            id: event.id,
            borrower_id: event.borrower_id,
            item_id: event.item_id,
            lent_at: event.lent_at,
            latitude: event.latitude,
            longitude: event.longitude,
            item,
        }
    }
}

/// Validated lend, ready for the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewLendingEvent {
    pub borrower_id: i32,
    pub item_id: i32,
    pub latitude: f64,
    pub longitude: f64,
}

/// Lend request body. The borrower comes from the classified request.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LendRequest {
    #[schema(value_type = Option<i32>)]
    pub item_id: Option<Value>,
    /// Degrees in [-90, 90]
    #[schema(value_type = Option<f64>)]
    pub latitude: Option<Value>,
    /// Degrees in [-180, 180]
    #[schema(value_type = Option<f64>)]
    pub longitude: Option<Value>,
}

/// Absent, null, zero, false and blank all count as no item id
fn is_missing(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

fn item_id_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i32::try_from(i).ok(),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= f64::from(i32::MIN) && *f <= f64::from(i32::MAX))
                .map(|f| f as i32),
        },
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

fn coordinate(value: &Option<Value>, name: &str, bound: f64) -> AppResult<f64> {
    let value = match value {
        Some(v) if !v.is_null() => v,
        _ => return Err(AppError::Validation(format!("{} is required", name))),
    };
    coerce_number(value)
        .filter(|n| (-bound..=bound).contains(n))
        .ok_or_else(|| {
            AppError::Validation(format!("{} must be between -{} and {}", name, bound, bound))
        })
}

impl LendRequest {
    /// Check item id, then latitude, then longitude; first failure wins.
    pub fn validate(self, borrower_id: i32) -> AppResult<NewLendingEvent> {
        if is_missing(&self.item_id) {
            return Err(AppError::Validation("item_id is required".to_string()));
        }
        let item_id = self
            .item_id
            .as_ref()
            .and_then(item_id_value)
            .ok_or_else(|| AppError::Validation("item_id must be an integer".to_string()))?;
        let latitude = coordinate(&self.latitude, "latitude", 90.0)?;
        let longitude = coordinate(&self.longitude, "longitude", 180.0)?;

        Ok(NewLendingEvent {
            borrower_id,
            item_id,
            latitude,
            longitude,
        })
    }
}
