//! Booking service wire types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartLineItem;

/// Payment method tag sent with bookings and payment updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    DebitCard,
    Paypal,
    BankTransfer,
}

impl PaymentMethod {
    /// Card methods require card details at checkout.
    pub fn is_card(&self) -> bool {
        matches!(self, Self::CreditCard | Self::DebitCard)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CreditCard => "CREDIT_CARD",
            Self::DebitCard => "DEBIT_CARD",
            Self::Paypal => "PAYPAL",
            Self::BankTransfer => "BANK_TRANSFER",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub user_id: i64,
    pub event_id: i64,
    pub booking_reference: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub items: Vec<BookingItemRequest>,
    pub payment_method: PaymentMethod,
}

impl CreateBookingRequest {
    /// One booking per cart line, carrying a single order line.
    pub fn for_line_item(
        user_id: i64,
        item: &CartLineItem,
        booking_reference: String,
        payment_method: PaymentMethod,
    ) -> Self {
        let total = item.total_price();
        Self {
            user_id,
            event_id: item.event_id,
            booking_reference,
            total_amount: total,
            items: vec![BookingItemRequest {
                ticket_type_id: None,
                seat_id: None,
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: total,
            }],
            payment_method,
        }
    }
}

/// Order line inside a booking request. Ticket types and seats are not chosen
/// by the storefront, so both are always sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingItemRequest {
    pub ticket_type_id: Option<i64>,
    pub seat_id: Option<i64>,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

/// Body of `PUT /bookings/{id}/payment`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
}

impl PaymentUpdate {
    pub fn completed(payment_method: PaymentMethod) -> Self {
        Self {
            payment_status: PaymentStatus::Completed,
            payment_method,
        }
    }
}

/// A booking as returned by the booking service. Only `id` is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub total_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}
