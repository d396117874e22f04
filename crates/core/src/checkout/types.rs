//! Checkout types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RetryPolicy;
use crate::booking::{Booking, PaymentMethod};
use crate::cart::OrderSummary;
use crate::config::CheckoutConfig;

/// Where checkout lives; used as the login return target.
pub const CHECKOUT_PATH: &str = "/checkout";

const CARD_NUMBER_MAX: usize = 16;
const CARD_NUMBER_MIN: usize = 12;
const EXPIRY_LEN: usize = 4;
const CVV_MAX: usize = 4;
const CVV_MIN: usize = 3;

/// Submission state.
///
/// A failed submission goes straight back to `Idle`; its error is returned to
/// the caller and kept in [`CheckoutStatus::last_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
}

/// Snapshot for status displays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckoutStatus {
    pub phase: CheckoutPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Payment form contents.
///
/// Card fields keep digits only and are truncated to their input lengths. They
/// are checked locally and never leave the process: only the method tag is sent
/// to the booking service.
#[derive(Clone, Default, Deserialize)]
#[serde(from = "PaymentForm")]
pub struct PaymentDetails {
    method: PaymentMethod,
    cardholder_name: String,
    card_number: String,
    expiry: String,
    cvv: String,
}

impl PaymentDetails {
    /// Non-card payment.
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Card payment; input is sanitized the same way the form does it.
    pub fn card(
        method: PaymentMethod,
        cardholder_name: &str,
        card_number: &str,
        expiry: &str,
        cvv: &str,
    ) -> Self {
        Self {
            method,
            cardholder_name: cardholder_name.trim().to_string(),
            card_number: digits(card_number, CARD_NUMBER_MAX),
            expiry: digits(expiry, EXPIRY_LEN),
            cvv: digits(cvv, CVV_MAX),
        }
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    pub fn expiry(&self) -> &str {
        &self.expiry
    }

    pub fn cvv(&self) -> &str {
        &self.cvv
    }

    /// Check the fields required for the chosen method.
    pub fn validate(&self) -> Result<(), String> {
        if !self.method.is_card() {
            return Ok(());
        }
        if self.cardholder_name.is_empty() {
            return Err("Cardholder name is required".to_string());
        }
        if self.card_number.len() < CARD_NUMBER_MIN {
            return Err("Card number is incomplete".to_string());
        }
        if self.expiry.len() != EXPIRY_LEN {
            return Err("Expiry date must be MMYY".to_string());
        }
        let month: u32 = self.expiry[..2].parse().unwrap_or(0);
        if !(1..=12).contains(&month) {
            return Err("Expiry month must be between 01 and 12".to_string());
        }
        if self.cvv.len() < CVV_MIN {
            return Err("CVV is incomplete".to_string());
        }
        Ok(())
    }
}

impl std::fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("method", &self.method)
            .field("card", &(!self.card_number.is_empty()).then_some("<redacted>"))
            .finish()
    }
}

/// Raw form as submitted by the browser.
#[derive(Deserialize)]
struct PaymentForm {
    #[serde(default)]
    payment_method: PaymentMethod,
    #[serde(default)]
    cardholder_name: String,
    #[serde(default)]
    card_number: String,
    #[serde(default)]
    expiry: String,
    #[serde(default)]
    cvv: String,
}

impl From<PaymentForm> for PaymentDetails {
    fn from(form: PaymentForm) -> Self {
        Self::card(
            form.payment_method,
            &form.cardholder_name,
            &form.card_number,
            &form.expiry,
            &form.cvv,
        )
    }
}

fn digits(input: &str, max: usize) -> String {
    input.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub bookings: Vec<Booking>,
    pub summary: OrderSummary,
    /// Where to send the user next.
    pub redirect: String,
    /// How long to show the confirmation first.
    pub redirect_delay_ms: u64,
    pub completed_at: DateTime<Utc>,
}

/// Orchestrator settings, usually derived from [`CheckoutConfig`].
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub tax_rate: Decimal,
    pub redirect_delay: Duration,
    pub bookings_path: String,
    pub payment_retry: RetryPolicy,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self::from(&CheckoutConfig::default())
    }
}

impl From<&CheckoutConfig> for CheckoutSettings {
    fn from(config: &CheckoutConfig) -> Self {
        Self {
            tax_rate: config.tax_rate,
            redirect_delay: Duration::from_millis(config.redirect_delay_ms),
            bookings_path: config.bookings_path.clone(),
            payment_retry: RetryPolicy::from(&config.payment_retry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_fields_are_digit_filtered_and_truncated() {
        let details = PaymentDetails::card(
            PaymentMethod::CreditCard,
            " Ada Lovelace ",
            "4111 1111-1111 1111 9999",
            "12/29",
            "12a34b5",
        );
        assert_eq!(details.card_number(), "4111111111111111");
        assert_eq!(details.expiry(), "1229");
        assert_eq!(details.cvv(), "1234");
        assert!(details.validate().is_ok());
    }

    #[test]
    fn test_card_method_requires_card_fields() {
        let details = PaymentDetails::new(PaymentMethod::DebitCard);
        assert_eq!(
            details.validate(),
            Err("Cardholder name is required".to_string())
        );

        let bad_month =
            PaymentDetails::card(PaymentMethod::CreditCard, "A", "4111111111111111", "1329", "123");
        assert!(bad_month.validate().is_err());

        let short_cvv =
            PaymentDetails::card(PaymentMethod::CreditCard, "A", "4111111111111111", "0129", "1");
        assert!(short_cvv.validate().is_err());
    }

    #[test]
    fn test_non_card_methods_need_nothing() {
        assert!(PaymentDetails::new(PaymentMethod::Paypal).validate().is_ok());
        assert!(PaymentDetails::new(PaymentMethod::BankTransfer)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_deserialize_sanitizes_form() {
        let details: PaymentDetails = serde_json::from_str(
            r#"{"payment_method":"CREDIT_CARD","cardholder_name":"Ada",
                "card_number":"4111-1111-1111-1111","expiry":"01/30","cvv":"123"}"#,
        )
        .unwrap();
        assert_eq!(details.method(), PaymentMethod::CreditCard);
        assert_eq!(details.card_number(), "4111111111111111");
        assert_eq!(details.expiry(), "0130");
    }

    #[test]
    fn test_debug_does_not_leak_card_data() {
        let details = PaymentDetails::card(
            PaymentMethod::CreditCard,
            "Ada",
            "4111111111111111",
            "0130",
            "987",
        );
        let rendered = format!("{:?}", details);
        assert!(!rendered.contains("4111"));
        assert!(!rendered.contains("987"));
        assert!(!rendered.contains("Ada"));
    }

    #[test]
    fn test_settings_from_config() {
        let settings = CheckoutSettings::default();
        assert_eq!(settings.tax_rate, Decimal::new(1, 1));
        assert_eq!(settings.redirect_delay, Duration::from_millis(2000));
        assert_eq!(settings.bookings_path, "/bookings");
    }
}
