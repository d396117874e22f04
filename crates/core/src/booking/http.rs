//! Booking service HTTP client.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use super::{Booking, BookingError, BookingService, CreateBookingRequest, PaymentUpdate};
use crate::config::ServiceConfig;

/// Client for the booking service REST API.
pub struct HttpBookingClient {
    client: Client,
    base_url: String,
}

impl HttpBookingClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, BookingError> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// Turn a non-success response into `Rejected`, preferring the service's
    /// `{"error": ...}` message over `fallback`.
    async fn rejection(response: Response, fallback: &str) -> BookingError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        BookingError::Rejected { status, message }
    }
}

#[async_trait]
impl BookingService for HttpBookingClient {
    async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking, BookingError> {
        let url = format!("{}/bookings", self.base_url);

        debug!(
            "Creating booking: event={}, reference={}",
            request.event_id, request.booking_reference
        );

        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response, "Failed to create booking").await);
        }

        let booking: Booking = response.json().await.map_err(|e| {
            BookingError::Parse(format!("Failed to parse booking response: {}", e))
        })?;

        debug!("Booking {} created for event {}", booking.id, request.event_id);

        Ok(booking)
    }

    async fn confirm_payment(
        &self,
        booking_id: i64,
        update: &PaymentUpdate,
    ) -> Result<(), BookingError> {
        let url = format!("{}/bookings/{}/payment", self.base_url, booking_id);

        debug!(
            "Confirming payment: booking={}, method={}",
            booking_id, update.payment_method
        );

        let response = self.client.put(&url).json(update).send().await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response, "Failed to confirm payment").await);
        }

        Ok(())
    }

    async fn list_user_bookings(&self, user_id: i64) -> Result<Vec<Booking>, BookingError> {
        let url = format!("{}/bookings/user/{}", self.base_url, user_id);

        debug!("Listing bookings for user {}", user_id);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response, "Failed to retrieve bookings").await);
        }

        response.json().await.map_err(|e| {
            BookingError::Parse(format!("Failed to parse bookings response: {}", e))
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}
