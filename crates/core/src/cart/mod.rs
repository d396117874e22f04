//! Shopping cart.
//!
//! The cart holds at most one line item per event, mirrors every mutation to
//! the [`KeyValueStore`](crate::storage::KeyValueStore) before committing it in
//! memory, and recovers from missing or malformed persisted data by starting
//! empty.

mod store;
mod types;

pub use store::{CartStore, MAX_LINE_QUANTITY};
pub use types::*;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity outside the accepted range for the operation.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Unit prices must not be negative.
    #[error("invalid unit price: {0}")]
    InvalidPrice(Decimal),

    /// The cart could not be serialized for persistence.
    #[error("failed to serialize cart: {0}")]
    Serialization(String),

    /// The persisted copy could not be written; the in-memory cart is unchanged.
    #[error("failed to persist cart: {0}")]
    Storage(#[from] StorageError),
}
