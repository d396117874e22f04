use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Event service (required)
    pub events: ServiceConfig,
    /// Booking service (required)
    pub bookings: ServiceConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Where the cart and session records are kept
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("storefront.db")
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    /// Nothing survives a restart.
    Memory,
}

/// A remote HTTP service (event service, booking service)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Base URL, e.g. "http://localhost:8081/api"
    pub url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_secs))
    }
}

fn default_timeout() -> u32 {
    30
}

/// Checkout behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutConfig {
    /// Flat tax rate used for the order summary (default: 0.1)
    #[serde(default = "default_tax_rate", with = "rust_decimal::serde::float")]
    pub tax_rate: Decimal,
    /// How long the success screen is shown before redirecting (default: 2000)
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_bookings_path")]
    pub bookings_path: String,
    #[serde(default)]
    pub payment_retry: RetryConfig,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            redirect_delay_ms: default_redirect_delay_ms(),
            login_path: default_login_path(),
            bookings_path: default_bookings_path(),
            payment_retry: RetryConfig::default(),
        }
    }
}

fn default_tax_rate() -> Decimal {
    Decimal::new(1, 1)
}

fn default_redirect_delay_ms() -> u64 {
    2000
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_bookings_path() -> String {
    "/bookings".to_string()
}

/// Backoff for payment confirmation retries
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Retries after the first attempt (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    5000
}

fn default_multiplier() -> f64 {
    2.0
}
