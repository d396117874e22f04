//! JSON error responses for the storefront API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use storefront_core::{
    AdapterError, Booking, BookingError, CartError, CatalogError, CheckoutError, SessionError,
};

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Where the client should navigate next, e.g. the login page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    /// Bookings left behind by a failed checkout.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub created_bookings: Vec<Booking>,
}

/// An error status with its JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.into(),
                redirect: None,
                created_bookings: Vec::new(),
            },
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub fn unauthorized(error: impl Into<String>, redirect: String) -> Self {
        let mut err = Self::new(StatusCode::UNAUTHORIZED, error);
        err.body.redirect = Some(redirect);
        err
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        let message = err.to_string();
        match err {
            CheckoutError::AlreadySubmitting => Self::new(StatusCode::CONFLICT, message),
            CheckoutError::Unauthenticated { redirect } => Self::unauthorized(message, redirect),
            CheckoutError::EmptyCart | CheckoutError::InvalidPayment(_) => {
                Self::bad_request(message)
            }
            CheckoutError::BookingFailed {
                created_bookings, ..
            } => {
                let mut err = Self::new(StatusCode::BAD_GATEWAY, message);
                err.body.created_bookings = created_bookings;
                err
            }
        }
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::InvalidQuantity(_) | CartError::InvalidPrice(_) => {
                Self::bad_request(err.to_string())
            }
            CartError::Serialization(_) | CartError::Storage(_) => {
                warn!("Cart update failed: {}", err);
                Self::internal(err.to_string())
            }
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => Self::not_found(err.to_string()),
            other => {
                warn!("Event service request failed: {}", other);
                Self::new(StatusCode::BAD_GATEWAY, other.to_string())
            }
        }
    }
}

impl From<AdapterError> for ApiError {
    fn from(err: AdapterError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        warn!("Booking service request failed: {}", err);
        Self::new(StatusCode::BAD_GATEWAY, err.user_message())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self::internal(err.to_string())
    }
}
