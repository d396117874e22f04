//! Cart handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storefront_core::{line_item_request, CartLineItem, CartStore, OrderSummary};

use super::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for adding tickets
#[derive(Debug, Deserialize)]
pub struct AddItemBody {
    pub event_id: i64,
    /// Defaults to a single ticket
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Request body for changing a line's quantity
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityBody {
    /// Zero or less removes the line
    pub quantity: i64,
}

/// Cart contents with totals
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartLineItem>,
    pub summary: OrderSummary,
    pub item_count: u32,
}

impl CartResponse {
    fn build(cart: &CartStore, state: &AppState) -> Self {
        Self {
            items: cart.items().to_vec(),
            summary: cart.summary(state.config().checkout.tax_rate),
            item_count: cart.get_item_count(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn get_cart(State(state): State<Arc<AppState>>) -> Json<CartResponse> {
    let cart = state.cart().read().await;
    Json(CartResponse::build(&cart, &state))
}

/// Look the event up and add `quantity` tickets at its current price.
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddItemBody>,
) -> Result<(StatusCode, Json<CartResponse>), ApiError> {
    let event = state.catalog().get_event(body.event_id).await?;
    let request = line_item_request(&event, body.quantity)?;

    let mut cart = state.cart().write().await;
    cart.add_to_cart(request)?;
    Ok((StatusCode::CREATED, Json(CartResponse::build(&cart, &state))))
}

pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateQuantityBody>,
) -> Result<Json<CartResponse>, ApiError> {
    let mut cart = state.cart().write().await;
    if cart.get(&id).is_none() {
        return Err(ApiError::not_found(format!("Cart item not found: {}", id)));
    }
    cart.update_quantity(&id, body.quantity)?;
    Ok(Json(CartResponse::build(&cart, &state)))
}

pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let mut cart = state.cart().write().await;
    cart.remove_from_cart(&id)?;
    Ok(Json(CartResponse::build(&cart, &state)))
}

pub async fn clear_cart(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CartResponse>, ApiError> {
    let mut cart = state.cart().write().await;
    cart.clear_cart()?;
    Ok(Json(CartResponse::build(&cart, &state)))
}
