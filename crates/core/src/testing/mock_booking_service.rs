//! Mock booking service for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::booking::{
    Booking, BookingError, BookingService, CreateBookingRequest, PaymentUpdate,
};

/// A recorded booking service call for test assertions.
#[derive(Debug, Clone)]
pub enum RecordedBookingCall {
    CreateBooking { request: CreateBookingRequest },
    ConfirmPayment { booking_id: i64, update: PaymentUpdate },
    ListUserBookings { user_id: i64 },
}

/// Injected failure for payment confirmations.
#[derive(Debug, Clone, Copy, Default)]
struct ConfirmationFailures {
    remaining: u32,
    status: u16,
}

/// Mock implementation of the BookingService trait.
///
/// Provides controllable behavior for testing:
/// - Assign sequential booking ids and remember created bookings
/// - Reject bookings for specific events
/// - Fail a number of payment confirmations
/// - Add artificial latency to every call
/// - Track calls for assertions
///
/// # Example
///
/// ```rust,ignore
/// use storefront_core::testing::MockBookingService;
///
/// let bookings = MockBookingService::new();
/// bookings.reject_event(2, 400, "sold out").await;
/// bookings.fail_next_confirmations(1, 503).await;
/// ```
#[derive(Debug)]
pub struct MockBookingService {
    /// Bookings created so far (plus any seeded ones).
    bookings: Arc<RwLock<Vec<Booking>>>,
    /// Next booking id to hand out.
    next_id: AtomicI64,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedBookingCall>>>,
    /// Booking ids whose payment was confirmed.
    confirmed: Arc<RwLock<Vec<i64>>>,
    /// Events whose bookings are rejected, with (status, error message).
    rejected_events: Arc<RwLock<HashMap<i64, (u16, String)>>>,
    confirmation_failures: Arc<RwLock<ConfirmationFailures>>,
    /// Delay applied to every call.
    latency: Arc<RwLock<Option<Duration>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<BookingError>>>,
}

impl Default for MockBookingService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBookingService {
    /// Create a new mock with no bookings.
    pub fn new() -> Self {
        Self {
            bookings: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicI64::new(1000),
            calls: Arc::new(RwLock::new(Vec::new())),
            confirmed: Arc::new(RwLock::new(Vec::new())),
            rejected_events: Arc::new(RwLock::new(HashMap::new())),
            confirmation_failures: Arc::new(RwLock::new(ConfirmationFailures::default())),
            latency: Arc::new(RwLock::new(None)),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Test Setup Methods
    // =========================================================================

    /// Seed an existing booking (returned by `list_user_bookings`).
    pub async fn add_booking(&self, booking: Booking) {
        self.bookings.write().await.push(booking);
    }

    /// Reject every booking for `event_id` with the given status and `{"error": message}`.
    pub async fn reject_event(&self, event_id: i64, status: u16, message: &str) {
        self.rejected_events
            .write()
            .await
            .insert(event_id, (status, message.to_string()));
    }

    /// Fail the next `count` payment confirmations with `status`.
    pub async fn fail_next_confirmations(&self, count: u32, status: u16) {
        *self.confirmation_failures.write().await = ConfirmationFailures {
            remaining: count,
            status,
        };
    }

    /// Delay every call by `latency`.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = Some(latency);
    }

    /// Set an error to be returned by the next operation.
    pub async fn set_next_error(&self, error: BookingError) {
        *self.next_error.write().await = Some(error);
    }

    // =========================================================================
    // Test Assertion Methods
    // =========================================================================

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedBookingCall> {
        self.calls.read().await.clone()
    }

    /// Requests received by `create_booking`, in arrival order.
    pub async fn created_requests(&self) -> Vec<CreateBookingRequest> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|c| match c {
                RecordedBookingCall::CreateBooking { request } => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of `confirm_payment` calls, successful or not.
    pub async fn confirm_attempts(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, RecordedBookingCall::ConfirmPayment { .. }))
            .count()
    }

    /// Booking ids whose payment was confirmed.
    pub async fn confirmed_ids(&self) -> Vec<i64> {
        self.confirmed.read().await.clone()
    }

    /// All bookings known to the mock.
    pub async fn bookings(&self) -> Vec<Booking> {
        self.bookings.read().await.clone()
    }

    /// Clear recorded calls.
    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    async fn record(&self, call: RecordedBookingCall) {
        self.calls.write().await.push(call);
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    async fn take_error(&self) -> Option<BookingError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl BookingService for MockBookingService {
    async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking, BookingError> {
        self.record(RecordedBookingCall::CreateBooking {
            request: request.clone(),
        })
        .await;
        self.simulate_latency().await;

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        let rejection = self.rejected_events.read().await.get(&request.event_id).cloned();
        if let Some((status, message)) = rejection {
            return Err(BookingError::Rejected { status, message });
        }

        let booking = Booking {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id: Some(request.user_id),
            event_id: Some(request.event_id),
            booking_reference: Some(request.booking_reference.clone()),
            status: Some("PENDING".to_string()),
            total_amount: Some(request.total_amount),
            currency: Some("USD".to_string()),
        };
        self.bookings.write().await.push(booking.clone());

        Ok(booking)
    }

    async fn confirm_payment(
        &self,
        booking_id: i64,
        update: &PaymentUpdate,
    ) -> Result<(), BookingError> {
        self.record(RecordedBookingCall::ConfirmPayment {
            booking_id,
            update: update.clone(),
        })
        .await;
        self.simulate_latency().await;

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        {
            let mut failures = self.confirmation_failures.write().await;
            if failures.remaining > 0 {
                failures.remaining -= 1;
                return Err(BookingError::Rejected {
                    status: failures.status,
                    message: "Failed to confirm payment".to_string(),
                });
            }
        }

        let mut bookings = self.bookings.write().await;
        match bookings.iter_mut().find(|b| b.id == booking_id) {
            Some(booking) => {
                booking.status = Some("CONFIRMED".to_string());
                self.confirmed.write().await.push(booking_id);
                Ok(())
            }
            None => Err(BookingError::Rejected {
                status: 404,
                message: "Payment not found".to_string(),
            }),
        }
    }

    async fn list_user_bookings(&self, user_id: i64) -> Result<Vec<Booking>, BookingError> {
        self.record(RecordedBookingCall::ListUserBookings { user_id })
            .await;
        self.simulate_latency().await;

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| b.user_id == Some(user_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::PaymentMethod;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_create_and_confirm() {
        let mock = MockBookingService::new();
        let request = fixtures::booking_request(42, 1);

        let booking = mock.create_booking(&request).await.unwrap();
        mock.confirm_payment(booking.id, &PaymentUpdate::completed(PaymentMethod::Paypal))
            .await
            .unwrap();

        assert_eq!(mock.confirmed_ids().await, vec![booking.id]);
        let listed = mock.list_user_bookings(42).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status.as_deref(), Some("CONFIRMED"));
        assert_eq!(mock.recorded_calls().await.len(), 3);
    }

    #[tokio::test]
    async fn test_rejected_event() {
        let mock = MockBookingService::new();
        mock.reject_event(1, 400, "sold out").await;

        let err = mock
            .create_booking(&fixtures::booking_request(42, 1))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "sold out");
        assert!(mock.bookings().await.is_empty());
    }

    #[tokio::test]
    async fn test_next_error_is_consumed() {
        let mock = MockBookingService::new();
        mock.set_next_error(BookingError::Parse("garbled".to_string()))
            .await;

        assert!(mock.list_user_bookings(1).await.is_err());
        assert!(mock.list_user_bookings(1).await.is_ok());
    }
}
