//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Downstream user-management service.
    pub user_service: UserServiceConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// API version header handling.
    pub api_version: ApiVersionConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Connection settings for the downstream user service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UserServiceConfig {
    /// Base URL, e.g. "http://user-service:8081".
    pub base_url: String,

    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Deadline for a whole outbound call (send + body) in milliseconds.
    pub request_timeout_ms: u64,

    /// Idle pooled connections kept per host.
    pub pool_max_idle_per_host: usize,

    /// Path probed by the readiness check.
    pub health_path: String,
}

impl UserServiceConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            connect_timeout_ms: 2_000,
            request_timeout_ms: 5_000,
            pool_max_idle_per_host: 32,
            health_path: "/actuator/health".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,

    /// Value of the `application` label attached to every metric.
    pub application: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
            application: "gateway".to_string(),
        }
    }
}

/// API version header handling for `/api` routes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiVersionConfig {
    /// Header read from the request and stamped on the response.
    pub header: String,

    /// Version assumed when the client sends none.
    pub default_version: String,
}

impl Default for ApiVersionConfig {
    fn default() -> Self {
        Self {
            header: "API-Version".to_string(),
            default_version: "1.0".to_string(),
        }
    }
}
