use axum::{extract::State, Json};
use std::sync::Arc;
use storefront_core::Booking;

use super::error::ApiError;
use crate::state::AppState;

/// Bookings of the signed-in user.
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let session = state.session();
    let bookings_path = &state.config().checkout.bookings_path;
    let user = session.has_session().map_err(|e| {
        ApiError::unauthorized(e.to_string(), session.login_redirect(bookings_path))
    })?;

    let bookings = state.bookings().list_user_bookings(user.id).await?;
    Ok(Json(bookings))
}
