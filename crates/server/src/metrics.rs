//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the storefront server:
//! - HTTP request metrics (latency, counts, in-flight)
//! - Checkout outcomes and bookings created
//! - Cart contents (collected dynamically)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use tracing::warn;

use storefront_core::CheckoutError;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "storefront_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .expect("valid histogram definition")
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("storefront_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .expect("valid counter definition")
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "storefront_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .expect("valid gauge definition")
});

// =============================================================================
// Checkout Metrics
// =============================================================================

/// Checkout submissions by outcome.
pub static CHECKOUTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("storefront_checkouts_total", "Checkout submissions by outcome"),
        &["outcome"],
    )
    .expect("valid counter definition")
});

/// Bookings created by successful checkouts.
pub static BOOKINGS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "storefront_bookings_created_total",
        "Bookings created and paid through checkout",
    )
    .expect("valid counter definition")
});

/// Bookings left on the booking service by failed checkouts.
pub static BOOKINGS_ORPHANED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "storefront_bookings_orphaned_total",
        "Bookings created during checkouts that failed overall",
    )
    .expect("valid counter definition")
});

// =============================================================================
// Cart Metrics (collected dynamically)
// =============================================================================

/// Line items in the cart.
pub static CART_LINES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("storefront_cart_lines", "Number of line items in the cart")
        .expect("valid gauge definition")
});

/// Tickets in the cart.
pub static CART_TICKETS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("storefront_cart_tickets", "Number of tickets in the cart")
        .expect("valid gauge definition")
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // HTTP
        Box::new(HTTP_REQUEST_DURATION.clone()),
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()),
        // Checkout
        Box::new(CHECKOUTS_TOTAL.clone()),
        Box::new(BOOKINGS_CREATED_TOTAL.clone()),
        Box::new(BOOKINGS_ORPHANED_TOTAL.clone()),
        // Cart
        Box::new(CART_LINES.clone()),
        Box::new(CART_TICKETS.clone()),
    ];

    for collector in collectors {
        if let Err(e) = registry.register(collector) {
            warn!("Failed to register metric: {}", e);
        }
    }
}

/// Outcome label for a checkout result.
pub fn checkout_outcome(error: Option<&CheckoutError>) -> &'static str {
    match error {
        None => "succeeded",
        Some(CheckoutError::AlreadySubmitting) => "already_submitting",
        Some(CheckoutError::Unauthenticated { .. }) => "unauthenticated",
        Some(CheckoutError::EmptyCart) => "empty_cart",
        Some(CheckoutError::InvalidPayment(_)) => "invalid_payment",
        Some(CheckoutError::BookingFailed { .. }) => "booking_failed",
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the cart gauges reflect the current contents.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let cart = state.cart().read().await;
    CART_LINES.set(cart.items().len() as i64);
    CART_TICKETS.set(i64::from(cart.get_item_count()));
}

/// Normalize a path for metrics labels.
///
/// Replaces numeric ids and line ids (UUIDs) with placeholders to keep
/// label cardinality bounded.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let mut normalized = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        let prev = if i > 0 { segments[i - 1] } else { "" };

        let replacement = if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
            Some("{id}")
        } else if prev == "items" && is_uuid(segment) {
            Some("{line_id}")
        } else {
            None
        };

        normalized.push(replacement.unwrap_or(segment));
    }

    normalized.join("/")
}

fn is_uuid(s: &str) -> bool {
    s.len() == 36
        && s.chars()
            .enumerate()
            .all(|(i, c)| match i {
                8 | 13 | 18 | 23 => c == '-',
                _ => c.is_ascii_hexdigit(),
            })
}
