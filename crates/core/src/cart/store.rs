//! Write-through cart store.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{AddToCartRequest, CartError, CartLineItem, OrderSummary};
use crate::storage::{KeyValueStore, CART_KEY};

/// Largest quantity a single line may hold.
pub const MAX_LINE_QUANTITY: u32 = 10_000;

/// The session's cart.
///
/// Every mutation builds the next collection, writes it to the backing store
/// and only then replaces the in-memory copy, so the two never diverge.
pub struct CartStore {
    items: Vec<CartLineItem>,
    store: Arc<dyn KeyValueStore>,
}

impl CartStore {
    /// Restore the cart from `store`.
    ///
    /// Missing data yields an empty cart. Unreadable or malformed data is
    /// logged and also yields an empty cart; it is never surfaced as an error.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let items = match store.load(CART_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
                Ok(items) => merge_duplicate_events(items),
                Err(e) => {
                    warn!("Failed to parse persisted cart, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read persisted cart, starting empty: {}", e);
                Vec::new()
            }
        };

        debug!("Cart loaded with {} line item(s)", items.len());
        Self { items, store }
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line item by its id.
    pub fn get(&self, id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Look up the line item for an event.
    pub fn find_by_event(&self, event_id: i64) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.event_id == event_id)
    }

    /// Add tickets for an event.
    ///
    /// If the event is already in the cart its quantity is incremented and the
    /// existing unit price snapshot is kept; otherwise a new line is appended.
    pub fn add_to_cart(&mut self, request: AddToCartRequest) -> Result<(), CartError> {
        if request.quantity == 0 || request.quantity > MAX_LINE_QUANTITY {
            return Err(CartError::InvalidQuantity(i64::from(request.quantity)));
        }
        if request.unit_price < Decimal::ZERO {
            return Err(CartError::InvalidPrice(request.unit_price));
        }

        let mut next = self.items.clone();
        match next.iter_mut().find(|i| i.event_id == request.event_id) {
            Some(existing) => {
                let merged = i64::from(existing.quantity) + i64::from(request.quantity);
                if merged > i64::from(MAX_LINE_QUANTITY) {
                    return Err(CartError::InvalidQuantity(merged));
                }
                existing.quantity = existing.quantity + request.quantity;
                debug!(
                    "Merged {} ticket(s) into line {} for event {}",
                    request.quantity, existing.id, request.event_id
                );
            }
            None => {
                let line = CartLineItem {
                    id: Uuid::new_v4().to_string(),
                    event_id: request.event_id,
                    event_title: request.event_title,
                    event_date: request.event_date,
                    quantity: request.quantity,
                    unit_price: request.unit_price,
                    image_url: request.image_url,
                };
                debug!("Added line {} for event {}", line.id, line.event_id);
                next.push(line);
            }
        }

        self.commit(next)
    }

    /// Remove a line item. Unknown ids are ignored.
    pub fn remove_from_cart(&mut self, id: &str) -> Result<(), CartError> {
        if self.get(id).is_none() {
            return Ok(());
        }
        let next = self.items.iter().filter(|i| i.id != id).cloned().collect();
        self.commit(next)
    }

    /// Set a line's quantity. Zero or negative removes the line; unknown ids are ignored.
    ///
    /// Quantities above [`MAX_LINE_QUANTITY`] are rejected.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove_from_cart(id);
        }
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q <= MAX_LINE_QUANTITY)
            .ok_or(CartError::InvalidQuantity(quantity))?;

        if self.get(id).is_none() {
            return Ok(());
        }
        let next = self
            .items
            .iter()
            .map(|i| {
                if i.id == id {
                    CartLineItem {
                        quantity,
                        ..i.clone()
                    }
                } else {
                    i.clone()
                }
            })
            .collect();
        self.commit(next)
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) -> Result<(), CartError> {
        self.commit(Vec::new())
    }

    /// Take booked tickets out of the cart.
    ///
    /// `booked` is the snapshot a checkout worked from. Each matching line
    /// loses the booked quantity and is removed once nothing is left. Lines
    /// added after the snapshot, and any quantity raised beyond it, stay.
    pub fn settle_booked(&mut self, booked: &[CartLineItem]) -> Result<(), CartError> {
        let next: Vec<CartLineItem> = self
            .items
            .iter()
            .filter_map(|line| {
                let settled = booked
                    .iter()
                    .filter(|b| b.id == line.id)
                    .fold(0u32, |acc, b| acc.saturating_add(b.quantity));
                match line.quantity.checked_sub(settled) {
                    Some(0) | None => None,
                    Some(remaining) => Some(CartLineItem {
                        quantity: remaining,
                        ..line.clone()
                    }),
                }
            })
            .collect();

        debug!(
            "Settled {} booked line(s), {} line(s) left in cart",
            booked.len(),
            next.len()
        );
        self.commit(next)
    }

    /// Sum of all line totals.
    pub fn get_total(&self) -> Decimal {
        self.items.iter().map(CartLineItem::total_price).sum()
    }

    /// Sum of all quantities (badge count).
    pub fn get_item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Subtotal, tax and total for the current contents.
    pub fn summary(&self, tax_rate: Decimal) -> OrderSummary {
        OrderSummary::new(self.get_total(), tax_rate, self.get_item_count())
    }

    fn commit(&mut self, next: Vec<CartLineItem>) -> Result<(), CartError> {
        let raw =
            serde_json::to_string(&next).map_err(|e| CartError::Serialization(e.to_string()))?;
        self.store.save(CART_KEY, &raw)?;
        self.items = next;
        Ok(())
    }
}

/// Collapse rows that reference the same event (possible when another writer
/// raced us on the shared storage) into the first such row.
fn merge_duplicate_events(items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut merged: Vec<CartLineItem> = Vec::with_capacity(items.len());
    for item in items {
        match merged.iter_mut().find(|m| m.event_id == item.event_id) {
            Some(existing) => {
                warn!(
                    "Persisted cart had duplicate lines for event {}, merging",
                    item.event_id
                );
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => merged.push(item),
        }
    }
    merged
}
