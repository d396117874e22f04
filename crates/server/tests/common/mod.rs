//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock remote services injected, enabling E2E testing of the
//! storefront API without an event or booking service.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use storefront_core::{
    config::{CheckoutConfig, RetryConfig, ServerConfig, ServiceConfig, StorageConfig},
    testing::{MockBookingService, MockEventCatalog},
    BookingService, Config, EventCatalog, KeyValueStore, SqliteStore, StorageBackend,
};
use storefront_server::state::AppState;

/// Re-export fixtures for test convenience
pub use storefront_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_add_to_cart() {
///     let fixture = TestFixture::new().await;
///     fixture.catalog.add_event(fixtures::event(1, "Rock Night", 50)).await;
///
///     let response = fixture.post("/api/v1/cart/items", json!({
///         "event_id": 1,
///         "quantity": 2
///     })).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Shared state behind the router
    pub state: Arc<AppState>,
    /// Mock event service - configure events
    pub catalog: Arc<MockEventCatalog>,
    /// Mock booking service - control bookings and payments
    pub bookings: Arc<MockBookingService>,
    /// Temporary directory for the storage database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("storefront.db");

        let catalog = Arc::new(MockEventCatalog::new());
        let bookings = Arc::new(MockBookingService::new());

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            storage: StorageConfig {
                backend: StorageBackend::Sqlite,
                path: db_path.clone(),
            },
            events: ServiceConfig {
                url: "http://events.invalid".to_string(),
                timeout_secs: 5,
            },
            bookings: ServiceConfig {
                url: "http://bookings.invalid".to_string(),
                timeout_secs: 5,
            },
            checkout: CheckoutConfig {
                payment_retry: RetryConfig {
                    max_retries: 1,
                    initial_delay_ms: 1,
                    max_delay_ms: 1,
                    multiplier: 1.0,
                },
                ..CheckoutConfig::default()
            },
        };

        let store: Arc<dyn KeyValueStore> =
            Arc::new(SqliteStore::new(&db_path).expect("Failed to open store"));

        let state = Arc::new(AppState::new(
            config,
            store,
            Arc::clone(&catalog) as Arc<dyn EventCatalog>,
            Arc::clone(&bookings) as Arc<dyn BookingService>,
        ));

        let router = storefront_server::api::create_router(Arc::clone(&state));

        Self {
            router,
            state,
            catalog,
            bookings,
            temp_dir,
        }
    }

    /// Store `fixtures::user(id)` as the signed-in user.
    pub async fn sign_in(&self, id: i64) {
        let user = serde_json::to_value(fixtures::user(id)).unwrap();
        let response = self.put("/api/v1/session", user).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    /// Add `quantity` tickets for `event_id` through the API.
    pub async fn add_to_cart(&self, event_id: i64, quantity: u32) -> TestResponse {
        self.post(
            "/api/v1/cart/items",
            serde_json::json!({ "event_id": event_id, "quantity": quantity }),
        )
        .await
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into_owned()))
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
