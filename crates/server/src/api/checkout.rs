//! Checkout handlers.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use storefront_core::{CheckoutError, CheckoutReceipt, CheckoutStatus, PaymentDetails};

use super::error::ApiError;
use crate::metrics::{
    checkout_outcome, BOOKINGS_CREATED_TOTAL, BOOKINGS_ORPHANED_TOTAL, CHECKOUTS_TOTAL,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProceedResponse {
    pub redirect: String,
}

/// "Proceed to checkout" from the cart page.
pub async fn proceed(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProceedResponse>, ApiError> {
    let redirect = state.checkout().proceed().await?;
    Ok(Json(ProceedResponse { redirect }))
}

/// Submit the payment form and book every cart line.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(payment): Json<PaymentDetails>,
) -> Result<Json<CheckoutReceipt>, ApiError> {
    let result = state.checkout().submit(payment).await;

    CHECKOUTS_TOTAL
        .with_label_values(&[checkout_outcome(result.as_ref().err())])
        .inc();

    match result {
        Ok(receipt) => {
            BOOKINGS_CREATED_TOTAL.inc_by(receipt.bookings.len() as u64);
            Ok(Json(receipt))
        }
        Err(e) => {
            if let CheckoutError::BookingFailed {
                created_bookings, ..
            } = &e
            {
                BOOKINGS_ORPHANED_TOTAL.inc_by(created_bookings.len() as u64);
            }
            Err(e.into())
        }
    }
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<CheckoutStatus> {
    Json(state.checkout().status())
}
