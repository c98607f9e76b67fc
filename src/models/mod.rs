//! Data models for the catalog and the lending ledger

pub mod item;
pub mod lending;

// Re-export commonly used types
pub use item::{CreateItem, Item, ItemChanges, NewItem, UpdateItem};
pub use lending::{LendRequest, LendingEvent, LendingRecord, NewLendingEvent};

use serde_json::Value;

/// Coerce a loosely typed JSON value to a finite number.
///
/// Numbers are taken as is, strings are parsed after trimming. Anything else,
/// including empty strings, is rejected.
pub(crate) fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    number.filter(|n| n.is_finite())
}
