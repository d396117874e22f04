use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{
    retry_if, CheckoutError, CheckoutPhase, CheckoutReceipt, CheckoutSettings, CheckoutStatus,
    PaymentDetails, RetryPolicy, CHECKOUT_PATH,
};
use crate::booking::{
    new_booking_reference, Booking, BookingError, BookingService, CreateBookingRequest,
    PaymentMethod, PaymentUpdate,
};
use crate::cart::{CartLineItem, CartStore, OrderSummary};
use crate::session::{SessionGate, UserRecord};

/// Drives a checkout submission against the booking service.
pub struct CheckoutOrchestrator {
    cart: Arc<RwLock<CartStore>>,
    session: SessionGate,
    bookings: Arc<dyn BookingService>,
    settings: CheckoutSettings,
    status: Mutex<CheckoutStatus>,
}

/// Why one cart line could not be booked.
struct LineFailure {
    message: String,
    /// Set when the booking was created but its payment could not be confirmed.
    created: Option<Booking>,
}

impl CheckoutOrchestrator {
    pub fn new(
        cart: Arc<RwLock<CartStore>>,
        session: SessionGate,
        bookings: Arc<dyn BookingService>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            cart,
            session,
            bookings,
            settings,
            status: Mutex::new(CheckoutStatus::default()),
        }
    }

    pub fn status(&self) -> CheckoutStatus {
        lock(&self.status).clone()
    }

    pub fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }

    /// "Proceed to checkout" from the cart page: the cart must have items and
    /// the user must be signed in. Returns the checkout location.
    pub async fn proceed(&self) -> Result<String, CheckoutError> {
        if self.cart.read().await.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.require_session()?;
        Ok(CHECKOUT_PATH.to_string())
    }

    /// Book every cart line and confirm its payment.
    ///
    /// Rejected with [`CheckoutError::AlreadySubmitting`] while another
    /// submission is running. If the returned future is dropped mid-flight the
    /// phase falls back to `Idle`; spawned booking tasks still run to completion.
    ///
    /// Every line is awaited before the outcome is reported, so a line that
    /// fails fast still waits on its slowest sibling. A failure can therefore
    /// take as long as the booking client's timeout plus the payment retries.
    ///
    /// On success only the booked snapshot is taken out of the cart. Lines
    /// added or quantities raised while the submission ran stay in the cart.
    pub async fn submit(&self, payment: PaymentDetails) -> Result<CheckoutReceipt, CheckoutError> {
        let submission = Submission::begin(&self.status)?;

        let result = self.run(payment).await;
        match &result {
            Ok(receipt) => {
                info!(
                    "Checkout succeeded: {} booking(s), total {}",
                    receipt.bookings.len(),
                    receipt.summary.total
                );
                submission.succeed();
            }
            Err(e) => {
                info!("Checkout failed: {}", e);
                submission.fail(e.to_string());
            }
        }
        result
    }

    fn require_session(&self) -> Result<UserRecord, CheckoutError> {
        self.session
            .has_session()
            .map_err(|_| CheckoutError::Unauthenticated {
                redirect: self.session.login_redirect(CHECKOUT_PATH),
            })
    }

    async fn run(&self, payment: PaymentDetails) -> Result<CheckoutReceipt, CheckoutError> {
        let user = self.require_session()?;

        let items: Vec<CartLineItem> = {
            let cart = self.cart.read().await;
            if cart.is_empty() {
                return Err(CheckoutError::EmptyCart);
            }
            cart.items().to_vec()
        };

        payment.validate().map_err(CheckoutError::InvalidPayment)?;

        let summary = OrderSummary::new(
            items.iter().map(CartLineItem::total_price).sum(),
            self.settings.tax_rate,
            items
                .iter()
                .fold(0u32, |acc, i| acc.saturating_add(i.quantity)),
        );
        let method = payment.method();

        info!(
            "Submitting checkout: user={}, lines={}, subtotal={}, method={}",
            user.id,
            items.len(),
            summary.subtotal,
            method
        );

        let mut tasks: FuturesUnordered<_> = items
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, item)| {
                let bookings = Arc::clone(&self.bookings);
                let retry = self.settings.payment_retry.clone();
                let user_id = user.id;
                tokio::spawn(async move {
                    let outcome = book_line(bookings, user_id, &item, method, &retry).await;
                    (index, outcome)
                })
            })
            .collect();

        let mut booked: Vec<(usize, Booking)> = Vec::new();
        let mut unconfirmed: Vec<Booking> = Vec::new();
        let mut first_failure: Option<String> = None;

        while let Some(joined) = tasks.next().await {
            match joined {
                Ok((index, Ok(booking))) => booked.push((index, booking)),
                Ok((_, Err(failure))) => {
                    unconfirmed.extend(failure.created);
                    first_failure.get_or_insert(failure.message);
                }
                Err(e) => {
                    warn!("Booking task did not complete: {}", e);
                    first_failure.get_or_insert_with(|| "Failed to create booking".to_string());
                }
            }
        }

        booked.sort_by_key(|(index, _)| *index);
        let bookings: Vec<Booking> = booked.into_iter().map(|(_, b)| b).collect();

        if let Some(message) = first_failure {
            let created_bookings: Vec<Booking> = bookings.into_iter().chain(unconfirmed).collect();
            for booking in &created_bookings {
                warn!(
                    "Booking {} ({}) remains on the booking service after failed checkout",
                    booking.id,
                    booking.booking_reference.as_deref().unwrap_or("no reference")
                );
            }
            return Err(CheckoutError::BookingFailed {
                message,
                created_bookings,
            });
        }

        if let Err(e) = self.cart.write().await.settle_booked(&items) {
            warn!(
                "Checkout completed but booked lines could not be removed from the cart: {}",
                e
            );
        }

        Ok(CheckoutReceipt {
            bookings,
            summary,
            redirect: self.settings.bookings_path.clone(),
            redirect_delay_ms: self.settings.redirect_delay.as_millis() as u64,
            completed_at: Utc::now(),
        })
    }
}

/// Create the booking for one line, then confirm its payment.
async fn book_line(
    bookings: Arc<dyn BookingService>,
    user_id: i64,
    item: &CartLineItem,
    method: PaymentMethod,
    retry: &RetryPolicy,
) -> Result<Booking, LineFailure> {
    let request =
        CreateBookingRequest::for_line_item(user_id, item, new_booking_reference(), method);

    let booking = bookings.create_booking(&request).await.map_err(|e| {
        warn!(
            "Booking failed for event {} ({}): {}",
            item.event_id, request.booking_reference, e
        );
        LineFailure {
            message: e.user_message(),
            created: None,
        }
    })?;

    debug!("Booking {} created for line {}", booking.id, item.id);

    let update = PaymentUpdate::completed(method);
    let confirmed = retry_if(retry, BookingError::is_transient, || {
        bookings.confirm_payment(booking.id, &update)
    })
    .await;

    match confirmed {
        Ok(()) => {
            debug!("Payment confirmed for booking {}", booking.id);
            Ok(booking)
        }
        Err(e) => {
            warn!("Payment confirmation failed for booking {}: {}", booking.id, e);
            Err(LineFailure {
                message: e.user_message(),
                created: Some(booking),
            })
        }
    }
}

fn lock(status: &Mutex<CheckoutStatus>) -> MutexGuard<'_, CheckoutStatus> {
    status.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the `Submitting` phase for one submission.
struct Submission<'a> {
    status: &'a Mutex<CheckoutStatus>,
    finished: bool,
}

impl<'a> Submission<'a> {
    fn begin(status: &'a Mutex<CheckoutStatus>) -> Result<Self, CheckoutError> {
        let mut current = lock(status);
        if current.phase == CheckoutPhase::Submitting {
            return Err(CheckoutError::AlreadySubmitting);
        }
        current.phase = CheckoutPhase::Submitting;
        current.last_error = None;
        Ok(Self {
            status,
            finished: false,
        })
    }

    fn succeed(mut self) {
        self.finished = true;
        lock(self.status).phase = CheckoutPhase::Succeeded;
    }

    fn fail(mut self, message: String) {
        self.finished = true;
        let mut current = lock(self.status);
        // Failure is reported through the returned error; the form is usable again.
        current.phase = CheckoutPhase::Idle;
        current.last_error = Some(message);
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let mut current = lock(self.status);
            if current.phase == CheckoutPhase::Submitting {
                debug!("Checkout submission abandoned");
                current.phase = CheckoutPhase::Idle;
            }
        }
    }
}
