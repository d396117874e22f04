use rust_decimal::Decimal;

use super::{types::Config, ConfigError, ServiceConfig};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Service URLs are http(s) and timeouts are positive
/// - Tax rate is within [0, 1]
/// - Retry multiplier is at least 1
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    validate_service("events", &config.events)?;
    validate_service("bookings", &config.bookings)?;

    let tax_rate = config.checkout.tax_rate;
    if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE {
        return Err(ConfigError::ValidationError(format!(
            "checkout.tax_rate must be between 0 and 1, got {}",
            tax_rate
        )));
    }

    let retry = &config.checkout.payment_retry;
    if retry.multiplier.is_nan() || retry.multiplier < 1.0 {
        return Err(ConfigError::ValidationError(format!(
            "checkout.payment_retry.multiplier must be at least 1, got {}",
            retry.multiplier
        )));
    }
    if retry.initial_delay_ms > retry.max_delay_ms {
        return Err(ConfigError::ValidationError(
            "checkout.payment_retry.initial_delay_ms cannot exceed max_delay_ms".to_string(),
        ));
    }

    Ok(())
}

fn validate_service(section: &str, service: &ServiceConfig) -> Result<(), ConfigError> {
    if !(service.url.starts_with("http://") || service.url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "{}.url must start with http:// or https://, got '{}'",
            section, service.url
        )));
    }
    if service.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(format!(
            "{}.timeout_secs cannot be 0",
            section
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CheckoutConfig, ServerConfig, StorageConfig};
    use std::net::IpAddr;

    fn service(url: &str) -> ServiceConfig {
        ServiceConfig {
            url: url.to_string(),
            timeout_secs: 30,
        }
    }

    fn valid_config() -> Config {
        Config {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            events: service("http://localhost:8081/api"),
            bookings: service("https://bookings.example.com/api"),
            checkout: CheckoutConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..valid_config()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = Config {
            events: service("localhost:8081"),
            ..valid_config()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("events.url"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = valid_config();
        config.bookings.timeout_secs = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("bookings.timeout_secs"));
    }

    #[test]
    fn test_validate_tax_rate_bounds() {
        let mut config = valid_config();
        config.checkout.tax_rate = Decimal::new(15, 1);
        assert!(validate_config(&config).is_err());

        config.checkout.tax_rate = Decimal::new(-1, 2);
        assert!(validate_config(&config).is_err());

        config.checkout.tax_rate = Decimal::ZERO;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_retry_settings() {
        let mut config = valid_config();
        config.checkout.payment_retry.multiplier = 0.5;
        assert!(validate_config(&config).is_err());

        let mut config = valid_config();
        config.checkout.payment_retry.initial_delay_ms = 10_000;
        config.checkout.payment_retry.max_delay_ms = 100;
        assert!(validate_config(&config).is_err());
    }
}
