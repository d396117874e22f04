//! Mock event catalog for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, EventCatalog, EventFilter, EventResource};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone)]
pub enum RecordedEventQuery {
    ListEvents { filter: EventFilter },
    GetEvent { id: i64 },
}

/// Mock implementation of the EventCatalog trait.
///
/// Serves a fixed set of events, applying filters the same way the HTTP client does.
#[derive(Debug)]
pub struct MockEventCatalog {
    /// Events in listing order.
    events: Arc<RwLock<Vec<EventResource>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedEventQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl Default for MockEventCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEventCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a mock catalog serving `events`.
    pub fn with_events(events: Vec<EventResource>) -> Self {
        Self {
            events: Arc::new(RwLock::new(events)),
            ..Self::new()
        }
    }

    /// Add an event, replacing any event with the same id.
    pub async fn add_event(&self, event: EventResource) {
        let mut events = self.events.write().await;
        events.retain(|e| e.id != event.id);
        events.push(event);
    }

    /// Set an error to be returned by the next operation.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedEventQuery> {
        self.queries.read().await.clone()
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl EventCatalog for MockEventCatalog {
    async fn list_events(&self, filter: &EventFilter) -> Result<Vec<EventResource>, CatalogError> {
        self.queries.write().await.push(RecordedEventQuery::ListEvents {
            filter: filter.clone(),
        });

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        Ok(filter.apply(self.events.read().await.clone()))
    }

    async fn get_event(&self, id: i64) -> Result<EventResource, CatalogError> {
        self.queries
            .write()
            .await
            .push(RecordedEventQuery::GetEvent { id });

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        self.events
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }
}
