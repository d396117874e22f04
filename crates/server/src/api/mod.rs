pub mod bookings;
pub mod cart;
pub mod checkout;
pub mod error;
pub mod events;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
