//! Booking service client.
//!
//! Creates one booking per cart line, marks its payment as completed, and
//! lists a user's bookings.

mod http;
mod reference;
mod types;

pub use http::HttpBookingClient;
pub use reference::{new_booking_reference, REFERENCE_PREFIX};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the booking service.
#[derive(Debug, Error)]
pub enum BookingError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl BookingError {
    /// Whether retrying the same call might succeed (transport failures and 5xx).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Rejected { status, .. } => *status >= 500,
            Self::Parse(_) => false,
        }
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Remote booking service.
#[async_trait]
pub trait BookingService: Send + Sync {
    /// `POST /bookings`
    async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking, BookingError>;

    /// `PUT /bookings/{id}/payment`
    async fn confirm_payment(
        &self,
        booking_id: i64,
        update: &PaymentUpdate,
    ) -> Result<(), BookingError>;

    /// `GET /bookings/user/{user_id}`
    async fn list_user_bookings(&self, user_id: i64) -> Result<Vec<Booking>, BookingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let server_error = BookingError::Rejected {
            status: 503,
            message: "unavailable".to_string(),
        };
        let client_error = BookingError::Rejected {
            status: 400,
            message: "sold out".to_string(),
        };
        assert!(server_error.is_transient());
        assert!(!client_error.is_transient());
        assert!(!BookingError::Parse("bad".to_string()).is_transient());
    }

    #[test]
    fn test_rejected_message_is_shown_verbatim() {
        let err = BookingError::Rejected {
            status: 400,
            message: "sold out".to_string(),
        };
        assert_eq!(err.to_string(), "sold out");
        assert_eq!(err.user_message(), "sold out");
    }
}
