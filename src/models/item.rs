//! Item (catalog entry) model and the validated write payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;

use super::coerce_number;
use crate::error::{AppError, AppResult};

/// Catalog item as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    pub id: i32,
    pub title: String,
    pub author: String,
    /// Units currently available to lend, never negative
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
    pub author: String,
    pub quantity: i32,
}

/// Validated partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub quantity: Option<i32>,
}

impl ItemChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.quantity.is_none()
    }

    /// Merge these changes into an existing item
    pub fn apply_to(&self, item: &mut Item, now: DateTime<Utc>) {
        if let Some(ref title) = self.title {
            item.title = title.clone();
        }
        if let Some(ref author) = self.author {
            item.author = author.clone();
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        item.updated_at = now;
    }
}

/// Create item request body
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateItem {
    #[schema(value_type = Option<String>)]
    pub title: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub author: Option<Value>,
    /// Non-negative integer, a numeric string is accepted
    #[schema(value_type = Option<i32>)]
    pub quantity: Option<Value>,
}

/// Update item request body; only the fields present are changed
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateItem {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<Value>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub author: Option<Option<Value>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub quantity: Option<Option<Value>>,
}

const TITLE_EMPTY: &str = "Title cannot be empty";
const AUTHOR_EMPTY: &str = "Author cannot be empty";
const QUANTITY_REQUIRED: &str = "Quantity is required";
const QUANTITY_INVALID: &str = "Quantity must be a non-negative integer";

/// A non-blank string; any other JSON value fails with `message`
fn required_text(value: Option<&Value>, message: &str) -> AppResult<String> {
    match value.and_then(Value::as_str).map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

/// Coerce a quantity to a non-negative integer, truncating any fraction
fn quantity_value(value: &Value) -> AppResult<i32> {
    coerce_number(value)
        .filter(|n| *n >= 0.0 && *n <= f64::from(i32::MAX))
        .map(|n| n.trunc() as i32)
        .ok_or_else(|| AppError::Validation(QUANTITY_INVALID.to_string()))
}

impl CreateItem {
    /// Check title, author, quantity presence, quantity range; first failure wins.
    pub fn validate(self) -> AppResult<NewItem> {
        let title = required_text(self.title.as_ref(), TITLE_EMPTY)?;
        let author = required_text(self.author.as_ref(), AUTHOR_EMPTY)?;
        let quantity = match self.quantity {
            None | Some(Value::Null) => {
                return Err(AppError::Validation(QUANTITY_REQUIRED.to_string()))
            }
            Some(ref value) => quantity_value(value)?,
        };

        Ok(NewItem {
            title,
            author,
            quantity,
        })
    }
}

impl UpdateItem {
    /// Validate each present field as on creation. An explicit `null` is present.
    pub fn validate(self) -> AppResult<ItemChanges> {
        let title = self
            .title
            .map(|t| required_text(t.as_ref(), TITLE_EMPTY))
            .transpose()?;
        let author = self
            .author
            .map(|a| required_text(a.as_ref(), AUTHOR_EMPTY))
            .transpose()?;
        let quantity = match self.quantity {
            None => None,
            Some(None) => return Err(AppError::Validation(QUANTITY_INVALID.to_string())),
            Some(Some(ref value)) => Some(quantity_value(value)?),
        };

        Ok(ItemChanges {
            title,
            author,
            quantity,
        })
    }
}
