//! Cart data types.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// One event's ticket selection in the cart.
///
/// `event_title`, `event_date` and `unit_price` are a snapshot taken when the
/// event was first added; they are not re-synced with the event service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "LineItemRecord", try_from = "LineItemRecord")]
pub struct CartLineItem {
    /// Opaque line identifier, stable across quantity changes.
    pub id: String,
    /// Referenced event.
    pub event_id: i64,
    pub event_title: String,
    pub event_date: String,
    /// Always positive.
    pub quantity: u32,
    /// Never negative.
    pub unit_price: Decimal,
    pub image_url: Option<String>,
}

impl CartLineItem {
    /// `quantity * unit_price`, recomputed on every call.
    pub fn total_price(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Request to put tickets for one event into the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub event_id: i64,
    pub event_title: String,
    pub event_date: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Price breakdown shown on the cart and checkout pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub item_count: u32,
}

impl OrderSummary {
    /// Build a summary from a subtotal; tax is rounded half away from zero to cents.
    pub fn new(subtotal: Decimal, tax_rate: Decimal, item_count: u32) -> Self {
        let tax = (subtotal * tax_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
            item_count,
        }
    }
}

/// Persisted shape of a line item, field-compatible with the storefront's
/// browser storage format. `totalPrice` is written for readers but ignored on
/// read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemRecord {
    id: String,
    event_id: i64,
    event_title: String,
    event_date: String,
    quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    unit_price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    total_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
}

impl From<CartLineItem> for LineItemRecord {
    fn from(item: CartLineItem) -> Self {
        Self {
            total_price: Some(item.total_price()),
            id: item.id,
            event_id: item.event_id,
            event_title: item.event_title,
            event_date: item.event_date,
            quantity: item.quantity,
            unit_price: item.unit_price,
            image_url: item.image_url,
        }
    }
}

impl TryFrom<LineItemRecord> for CartLineItem {
    type Error = String;

    fn try_from(record: LineItemRecord) -> Result<Self, Self::Error> {
        if record.quantity == 0 {
            return Err(format!("line item {} has zero quantity", record.id));
        }
        if record.unit_price < Decimal::ZERO {
            return Err(format!("line item {} has a negative unit price", record.id));
        }
        Ok(Self {
            id: record.id,
            event_id: record.event_id,
            event_title: record.event_title,
            event_date: record.event_date,
            quantity: record.quantity,
            unit_price: record.unit_price,
            image_url: record.image_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: u32, unit_price: Decimal) -> CartLineItem {
        CartLineItem {
            id: "line-1".to_string(),
            event_id: 7,
            event_title: "Jazz Night".to_string(),
            event_date: "2026-11-02T20:00:00".to_string(),
            quantity,
            unit_price,
            image_url: None,
        }
    }

    #[test]
    fn test_total_price_is_derived() {
        let line = item(3, Decimal::new(1250, 2));
        assert_eq!(line.total_price(), Decimal::new(3750, 2));
    }

    #[test]
    fn test_serialized_shape_is_camel_case_with_total() {
        let json = serde_json::to_value(item(2, Decimal::from(50))).unwrap();
        assert_eq!(json["eventId"], 7);
        assert_eq!(json["eventTitle"], "Jazz Night");
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["unitPrice"].as_f64(), Some(50.0));
        assert_eq!(json["totalPrice"].as_f64(), Some(100.0));
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_stored_total_is_ignored_on_read() {
        let json = r#"{"id":"x","eventId":1,"eventTitle":"A","eventDate":"2026-01-01",
            "quantity":2,"unitPrice":10,"totalPrice":999}"#;
        let line: CartLineItem = serde_json::from_str(json).unwrap();
        assert_eq!(line.total_price(), Decimal::from(20));
    }

    #[test]
    fn test_zero_quantity_is_rejected_on_read() {
        let json = r#"{"id":"x","eventId":1,"eventTitle":"A","eventDate":"2026-01-01",
            "quantity":0,"unitPrice":10}"#;
        assert!(serde_json::from_str::<CartLineItem>(json).is_err());
    }

    #[test]
    fn test_negative_price_is_rejected_on_read() {
        let json = r#"{"id":"x","eventId":1,"eventTitle":"A","eventDate":"2026-01-01",
            "quantity":1,"unitPrice":-5}"#;
        assert!(serde_json::from_str::<CartLineItem>(json).is_err());
    }

    #[test]
    fn test_order_summary_applies_tax() {
        let summary = OrderSummary::new(Decimal::from(200), Decimal::new(1, 1), 3);
        assert_eq!(summary.tax, Decimal::from(20));
        assert_eq!(summary.total, Decimal::from(220));
        assert_eq!(summary.item_count, 3);
    }

    #[test]
    fn test_order_summary_rounds_tax_to_cents() {
        let summary = OrderSummary::new(Decimal::new(1005, 2), Decimal::new(1, 1), 1);
        // 10.05 * 0.1 = 1.005 -> 1.01
        assert_eq!(summary.tax, Decimal::new(101, 2));
        assert_eq!(summary.total, Decimal::new(1106, 2));
    }
}
