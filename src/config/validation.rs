//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the downstream base URL is usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("user_service.base_url: {0}")]
    InvalidBaseUrl(String),

    #[error("{field}: invalid path '{value}', must start with '/'")]
    InvalidPath { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error(
        "timeouts.request_secs ({inbound_ms}ms) must exceed user_service.request_timeout_ms ({downstream_ms}ms)"
    )]
    TimeoutOrder { inbound_ms: u64, downstream_ms: u64 },

    #[error("api_version.header: '{0}' is not a valid header name")]
    InvalidHeader(String),

    #[error("{field}: must not be empty")]
    Empty { field: &'static str },
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if let Err(e) = check_base_url(&config.user_service.base_url) {
        errors.push(e);
    }

    let timeouts = [
        ("user_service.connect_timeout_ms", config.user_service.connect_timeout_ms),
        ("user_service.request_timeout_ms", config.user_service.request_timeout_ms),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ];
    for (field, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(field));
        }
    }

    // inbound deadline must outlast the downstream one
    let inbound_ms = config.timeouts.request_secs.saturating_mul(1000);
    let downstream_ms = config.user_service.request_timeout_ms;
    if inbound_ms > 0 && downstream_ms > 0 && inbound_ms <= downstream_ms {
        errors.push(ValidationError::TimeoutOrder {
            inbound_ms,
            downstream_ms,
        });
    }

    if !config.user_service.health_path.starts_with('/') {
        errors.push(ValidationError::InvalidPath {
            field: "user_service.health_path",
            value: config.user_service.health_path.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.observability.application.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "observability.application",
        });
    }

    if HeaderName::from_bytes(config.api_version.header.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidHeader(config.api_version.header.clone()));
    }

    if config.api_version.default_version.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "api_version.default_version",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(raw: &str) -> Result<(), ValidationError> {
    let url = Url::parse(raw).map_err(|e| ValidationError::InvalidBaseUrl(format!("'{raw}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidBaseUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(ValidationError::InvalidBaseUrl(format!("'{raw}' has no host")));
    }
    Ok(())
}
