//! Liveness and readiness reporting.
//!
//! # Data Flow
//! ```text
//! GET /health  → always UP while the process serves requests
//! GET /ready   → probe user service health path (bounded by client timeout)
//!              → UP with details, or DOWN with the probe error
//! ```

use serde::Serialize;

use crate::users::UserProxyService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

/// Details about the downstream dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyDetails {
    pub dependency: &'static str,
    pub url: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<DependencyDetails>,
}

impl HealthReport {
    pub fn up() -> Self {
        Self {
            status: HealthStatus::Up,
            details: None,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == HealthStatus::Up
    }
}

/// Probe the user service and describe the result.
pub async fn readiness(users: &UserProxyService, url: &str) -> HealthReport {
    match users.downstream_health().await {
        Ok(()) => HealthReport {
            status: HealthStatus::Up,
            details: Some(DependencyDetails {
                dependency: "user-service",
                url: url.to_string(),
                status: "Connected",
                error: None,
            }),
        },
        Err(error) => {
            tracing::warn!(url, error = %error, "User service readiness probe failed");
            HealthReport {
                status: HealthStatus::Down,
                details: Some(DependencyDetails {
                    dependency: "user-service",
                    url: url.to_string(),
                    status: "Disconnected",
                    error: Some(error),
                }),
            }
        }
    }
}
