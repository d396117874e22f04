pub mod booking;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod session;
pub mod storage;
pub mod testing;

pub use booking::{
    new_booking_reference, Booking, BookingError, BookingService, CreateBookingRequest,
    HttpBookingClient, PaymentMethod, PaymentUpdate,
};
pub use cart::{
    AddToCartRequest, CartError, CartLineItem, CartStore, OrderSummary, MAX_LINE_QUANTITY,
};
pub use catalog::{
    categories, line_item_request, AdapterError, CatalogError, EventCatalog, EventFilter,
    EventResource, HttpEventCatalog,
};
pub use checkout::{
    CheckoutError, CheckoutOrchestrator, CheckoutPhase, CheckoutReceipt, CheckoutSettings,
    CheckoutStatus, PaymentDetails, RetryPolicy,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, StorageBackend,
};
pub use session::{SessionError, SessionGate, UserRecord};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError};
