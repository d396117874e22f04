//! Event detail adapter: fetched event + chosen quantity -> cart request.

use thiserror::Error;

use super::EventResource;
use crate::cart::AddToCartRequest;

/// Reasons an event cannot be put in the cart. Shown to the user; nothing is added.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("Event {0} has no ticket price")]
    MissingPrice(i64),

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Event {0} is not available for booking")]
    NotBookable(i64),
}

/// Build the add-to-cart request for `quantity` tickets of `event`.
pub fn line_item_request(
    event: &EventResource,
    quantity: u32,
) -> Result<AddToCartRequest, AdapterError> {
    if quantity == 0 {
        return Err(AdapterError::InvalidQuantity);
    }
    if !event.is_bookable() {
        return Err(AdapterError::NotBookable(event.id));
    }
    let unit_price = event.price().ok_or(AdapterError::MissingPrice(event.id))?;

    Ok(AddToCartRequest {
        event_id: event.id,
        event_title: event.title.clone(),
        event_date: event.event_date.clone(),
        quantity,
        unit_price,
        image_url: event.image_url.clone(),
    })
}
