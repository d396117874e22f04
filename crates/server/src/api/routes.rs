use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{bookings, cart, checkout, events, handlers, middleware::metrics_middleware, session};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Events
        .route("/events", get(events::list_events))
        .route("/events/categories", get(events::list_categories))
        .route("/events/{id}", get(events::get_event))
        // Cart
        .route("/cart", get(cart::get_cart).delete(cart::clear_cart))
        .route("/cart/items", post(cart::add_item))
        .route(
            "/cart/items/{id}",
            put(cart::update_item).delete(cart::remove_item),
        )
        // Session
        .route(
            "/session",
            get(session::get_session)
                .put(session::put_session)
                .delete(session::delete_session),
        )
        // Checkout
        .route("/checkout", post(checkout::submit))
        .route("/checkout/proceed", post(checkout::proceed))
        .route("/checkout/status", get(checkout::get_status))
        // Bookings
        .route("/bookings", get(bookings::list_bookings))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
