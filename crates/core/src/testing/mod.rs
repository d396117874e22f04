//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of the remote service traits,
//! allowing checkout and browsing flows to be exercised without real services.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_core::testing::{fixtures, MockBookingService, MockEventCatalog};
//!
//! let catalog = MockEventCatalog::with_events(vec![fixtures::event(1, "Rock Night", 45)]);
//! let bookings = MockBookingService::new();
//!
//! // Configure failures
//! bookings.reject_event(1, 400, "sold out").await;
//!
//! // Use in AppState...
//! ```

mod mock_booking_service;
mod mock_event_catalog;

pub use mock_booking_service::{MockBookingService, RecordedBookingCall};
pub use mock_event_catalog::{MockEventCatalog, RecordedEventQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use rust_decimal::Decimal;

    use crate::booking::{BookingItemRequest, CreateBookingRequest, PaymentMethod};
    use crate::cart::AddToCartRequest;
    use crate::catalog::EventResource;
    use crate::session::UserRecord;

    /// Create a bookable event with a base price in whole currency units.
    pub fn event(id: i64, title: &str, base_price: i64) -> EventResource {
        EventResource {
            id,
            title: title.to_string(),
            description: Some(format!("{} live.", title)),
            event_date: "2026-09-01T19:00:00".to_string(),
            category: Some("Music".to_string()),
            status: Some("ACTIVE".to_string()),
            max_attendees: Some(500),
            base_price: Some(Decimal::from(base_price)),
            ticket_price: None,
            image_url: Some(format!("/images/events/{}.jpg", id)),
        }
    }

    /// Create an event in `category`.
    pub fn event_in(id: i64, title: &str, category: &str, base_price: i64) -> EventResource {
        EventResource {
            category: Some(category.to_string()),
            ..event(id, title, base_price)
        }
    }

    /// Create an add-to-cart request.
    pub fn add_request(event_id: i64, quantity: u32, unit_price: i64) -> AddToCartRequest {
        AddToCartRequest {
            event_id,
            event_title: format!("Event {}", event_id),
            event_date: "2026-09-01T19:00:00".to_string(),
            quantity,
            unit_price: Decimal::from(unit_price),
            image_url: None,
        }
    }

    /// Create a signed-in user record.
    pub fn user(id: i64) -> UserRecord {
        UserRecord {
            id,
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            first_name: "Test".to_string(),
            last_name: format!("User{}", id),
        }
    }

    /// Create a one-ticket booking request for `event_id`.
    pub fn booking_request(user_id: i64, event_id: i64) -> CreateBookingRequest {
        CreateBookingRequest {
            user_id,
            event_id,
            booking_reference: format!("BKTEST{}", event_id),
            total_amount: Decimal::from(25),
            items: vec![BookingItemRequest {
                ticket_type_id: None,
                seat_id: None,
                quantity: 1,
                unit_price: Decimal::from(25),
                total_price: Decimal::from(25),
            }],
            payment_method: PaymentMethod::CreditCard,
        }
    }
}
