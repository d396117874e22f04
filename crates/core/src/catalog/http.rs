//! Event service HTTP client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::{CatalogError, EventCatalog, EventFilter, EventResource};
use crate::config::ServiceConfig;

/// Client for the event service REST API.
///
/// The service has no server-side search, so filters are applied to the full
/// listing after it is fetched.
pub struct HttpEventCatalog {
    client: Client,
    base_url: String,
}

impl HttpEventCatalog {
    pub fn new(config: &ServiceConfig) -> Result<Self, CatalogError> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    async fn error_for(response: reqwest::Response) -> CatalogError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        CatalogError::Api {
            status: status.as_u16(),
            message: body,
        }
    }
}

#[async_trait]
impl EventCatalog for HttpEventCatalog {
    async fn list_events(&self, filter: &EventFilter) -> Result<Vec<EventResource>, CatalogError> {
        let url = format!("{}/events/", self.base_url);

        debug!("Listing events: filter={:?}", filter);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let events: Vec<EventResource> = response.json().await.map_err(|e| {
            CatalogError::Parse(format!("Failed to parse event listing: {}", e))
        })?;

        debug!("Event service returned {} event(s)", events.len());

        Ok(filter.apply(events))
    }

    async fn get_event(&self, id: i64) -> Result<EventResource, CatalogError> {
        let url = format!("{}/events/{}", self.base_url, id);

        debug!("Fetching event: id={}", id);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id));
        }
        if !status.is_success() {
            return Err(Self::error_for(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("Failed to parse event {}: {}", id, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn catalog_for(server: &MockServer) -> HttpEventCatalog {
        HttpEventCatalog::new(&ServiceConfig {
            url: format!("{}/api/", server.uri()),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn events_body() -> serde_json::Value {
        json!([
            {"id": 1, "title": "Rock Night", "eventDate": "2026-07-01T20:00:00",
             "category": "Music", "status": "ACTIVE", "basePrice": 45},
            {"id": 2, "title": "City Marathon", "eventDate": "2026-08-15T07:00:00",
             "category": "Sports", "ticketPrice": 20.5}
        ])
    }

    #[tokio::test]
    async fn test_list_events_applies_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(events_body()))
            .mount(&server)
            .await;

        let catalog = catalog_for(&server).await;

        let all = catalog.list_events(&EventFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let sports = catalog
            .list_events(&EventFilter {
                search: None,
                category: Some("Sports".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(sports.len(), 1);
        assert_eq!(sports[0].title, "City Marathon");
    }

    #[tokio::test]
    async fn test_get_event() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(events_body()[0].clone()))
            .mount(&server)
            .await;

        let event = catalog_for(&server).await.get_event(1).await.unwrap();
        assert_eq!(event.title, "Rock Night");
        assert_eq!(event.price(), Some(rust_decimal::Decimal::from(45)));
    }

    #[tokio::test]
    async fn test_get_event_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events/99"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "Event not found"})),
            )
            .mount(&server)
            .await;

        let err = catalog_for(&server).await.get_event(99).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(99)));
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
            .mount(&server)
            .await;

        let err = catalog_for(&server)
            .await
            .list_events(&EventFilter::default())
            .await
            .unwrap_err();
        match err {
            CatalogError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database down");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events/3"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = catalog_for(&server).await.get_event(3).await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
