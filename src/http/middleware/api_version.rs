//! API version negotiation for `/api` routes.
//!
//! Reads the version header (default `API-Version`), falls back to the
//! configured default, exposes it to handlers as an [`ApiVersion`]
//! extension, and stamps it on the response.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::config::ApiVersionConfig;

/// Version negotiated for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersion(pub HeaderValue);

/// Pre-parsed header name and default value.
#[derive(Debug, Clone)]
pub struct ApiVersionSettings {
    header: HeaderName,
    default_version: HeaderValue,
}

impl ApiVersionSettings {
    /// Parse from configuration, falling back to `API-Version: 1.0` for
    /// anything that is not a valid header.
    pub fn from_config(config: &ApiVersionConfig) -> Arc<Self> {
        let header = HeaderName::from_bytes(config.header.as_bytes()).unwrap_or_else(|_| {
            tracing::warn!(header = %config.header, "Invalid API version header, using default");
            HeaderName::from_static("api-version")
        });
        let default_version = HeaderValue::from_str(&config.default_version).unwrap_or_else(|_| {
            tracing::warn!(version = %config.default_version, "Invalid default API version");
            HeaderValue::from_static("1.0")
        });

        Arc::new(Self {
            header,
            default_version,
        })
    }
}

pub async fn api_version(
    State(settings): State<Arc<ApiVersionSettings>>,
    mut request: Request,
    next: Next,
) -> Response {
    let version = request
        .headers()
        .get(&settings.header)
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| settings.default_version.clone());

    tracing::debug!(api_version = ?version, "API version");
    request.extensions_mut().insert(ApiVersion(version.clone()));

    let mut response = next.run(request).await;
    response.headers_mut().insert(settings.header.clone(), version);
    response
}
