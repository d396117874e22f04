//! Session handlers. Sign-in itself happens elsewhere; these only store and
//! drop the user record the login flow hands over.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use storefront_core::UserRecord;

use super::error::ApiError;
use crate::state::AppState;

/// The signed-in user, or 401 with the login location.
pub async fn get_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserRecord>, ApiError> {
    let session = state.session();
    session
        .has_session()
        .map(Json)
        .map_err(|e| ApiError::unauthorized(e.to_string(), session.login_redirect("/")))
}

pub async fn put_session(
    State(state): State<Arc<AppState>>,
    Json(user): Json<UserRecord>,
) -> Result<Json<UserRecord>, ApiError> {
    state.session().sign_in(&user)?;
    Ok(Json(user))
}

pub async fn delete_session(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.session().sign_out()?;
    Ok(StatusCode::NO_CONTENT)
}
