use std::sync::Arc;

use tokio::sync::RwLock;

use storefront_core::{
    BookingService, CartStore, CheckoutOrchestrator, CheckoutSettings, Config, EventCatalog,
    KeyValueStore, SessionGate,
};

/// Shared application state
pub struct AppState {
    config: Config,
    cart: Arc<RwLock<CartStore>>,
    session: SessionGate,
    catalog: Arc<dyn EventCatalog>,
    bookings: Arc<dyn BookingService>,
    checkout: CheckoutOrchestrator,
}

impl AppState {
    /// Wire the cart, session and checkout over `store`, talking to the given
    /// remote services.
    pub fn new(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        catalog: Arc<dyn EventCatalog>,
        bookings: Arc<dyn BookingService>,
    ) -> Self {
        let cart = Arc::new(RwLock::new(CartStore::load(Arc::clone(&store))));
        let session = SessionGate::new(store, config.checkout.login_path.clone());
        let checkout = CheckoutOrchestrator::new(
            Arc::clone(&cart),
            session.clone(),
            Arc::clone(&bookings),
            CheckoutSettings::from(&config.checkout),
        );

        Self {
            config,
            cart,
            session,
            catalog,
            bookings,
            checkout,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cart(&self) -> &Arc<RwLock<CartStore>> {
        &self.cart
    }

    pub fn session(&self) -> &SessionGate {
        &self.session
    }

    pub fn catalog(&self) -> &Arc<dyn EventCatalog> {
        &self.catalog
    }

    pub fn bookings(&self) -> &Arc<dyn BookingService> {
        &self.bookings
    }

    pub fn checkout(&self) -> &CheckoutOrchestrator {
        &self.checkout
    }
}
