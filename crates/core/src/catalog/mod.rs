//! Event catalog: browsing the event service and turning events into cart requests.

mod adapter;
mod http;
mod types;

pub use adapter::{line_item_request, AdapterError};
pub use http::HttpEventCatalog;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the event service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Event not found (404).
    #[error("Event not found: {0}")]
    NotFound(i64),

    /// Event service returned an error.
    #[error("Event service error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Read access to the event service.
#[async_trait]
pub trait EventCatalog: Send + Sync {
    /// List events matching `filter`.
    async fn list_events(&self, filter: &EventFilter) -> Result<Vec<EventResource>, CatalogError>;

    /// Fetch a single event.
    async fn get_event(&self, id: i64) -> Result<EventResource, CatalogError>;
}
