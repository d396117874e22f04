//! Durable key-value persistence for session-local state.
//!
//! The cart and the signed-in user record are kept under fixed keys, serialized
//! as JSON text. Components depend on the [`KeyValueStore`] port, never on a
//! concrete backend, so tests can swap in [`MemoryStore`].

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Storage key holding the serialized signed-in user record.
pub const USER_KEY: &str = "user";

/// Errors raised by a key-value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying database rejected the operation.
    #[error("storage database error: {0}")]
    Database(String),

    /// The store cannot be used (e.g. a poisoned lock after a panic).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous key-value persistence port.
///
/// Writes are write-through: once `save` returns `Ok`, a subsequent `load`
/// of the same key observes the new value.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
