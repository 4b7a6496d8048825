use super::{types::Config, ConfigError, ServiceRole};

/// Validate configuration
/// Currently validates:
/// - Service role exists (enforced by serde)
/// - Server port is not 0
/// - Gateway downstream URLs are http(s) and the timeout is at least 1s
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == Some(0) {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Downstream settings only matter for the gateway
    if config.service.role == ServiceRole::Gateway {
        let gateway = &config.gateway;
        for (key, url) in [
            ("gateway.flight_url", &gateway.flight_url),
            ("gateway.ticket_url", &gateway.ticket_url),
            ("gateway.bonus_url", &gateway.bonus_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be an http(s) URL, got '{}'",
                    key, url
                )));
            }
        }

        if gateway.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.timeout_secs must be at least 1".to_string(),
            ));
        }
    }

    Ok(())
}
