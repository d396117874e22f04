//! Checkout orchestration.
//!
//! A submission moves the phase from `Idle` to `Submitting`, then to
//! `Succeeded`, or back to `Idle` when it fails:
//! - **Preconditions**: session present, cart non-empty, payment details valid.
//!   Nothing remote is called until all three pass.
//! - **Bookings**: one task per cart line creates a booking and confirms its
//!   payment. Tasks run concurrently and are never cancelled.
//! - **Outcome**: all lines booked → booked lines leave the cart, receipt
//!   returned. Lines added while the submission ran are kept. Any line
//!   failed → cart kept, the first failure reported together with the bookings
//!   that were created anyway (the booking service has no cancel call).

mod orchestrator;
mod retry;
mod types;

pub use orchestrator::CheckoutOrchestrator;
pub use retry::{retry_if, RetryPolicy};
pub use types::*;

use thiserror::Error;

use crate::booking::Booking;

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A submission is already in flight.
    #[error("Checkout already in progress")]
    AlreadySubmitting,

    /// No session; the user should be sent to `redirect`.
    #[error("Please login to checkout")]
    Unauthenticated { redirect: String },

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Invalid payment details: {0}")]
    InvalidPayment(String),

    /// At least one line could not be booked. `created_bookings` exist on the
    /// booking service regardless.
    #[error("{message}")]
    BookingFailed {
        message: String,
        created_bookings: Vec<Booking>,
    },
}
