//! Event browsing handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use storefront_core::{categories, EventFilter, EventResource};

use super::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// List events matching `?search=&category=`.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<EventFilter>,
) -> Result<Json<Vec<EventResource>>, ApiError> {
    let events = state.catalog().list_events(&filter).await?;
    Ok(Json(events))
}

/// Distinct categories across all events, for the category picker.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let events = state.catalog().list_events(&EventFilter::default()).await?;
    Ok(Json(CategoriesResponse {
        categories: categories(&events),
    }))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<EventResource>, ApiError> {
    let event = state.catalog().get_event(id).await?;
    Ok(Json(event))
}
