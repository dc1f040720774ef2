//! Downstream user-service client with timeout and error reporting.
//!
//! # Responsibilities
//! - Own the pooled HTTP connection to the user service
//! - Issue `GET /api/users/{id}/validate` and `POST /api/users/register`
//! - Report decoded bodies or raw transport failures, never interpreted
//!
//! # Design Decisions
//! - One reqwest `Client` per process; clones share the pool
//! - Every call runs under the configured deadline
//! - No retries: a failure is reported exactly once

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tokio::time::timeout;
use url::Url;

use crate::config::UserServiceConfig;
use crate::users::error::{TransportError, TransportResult};
use crate::users::types::{RegistrationRequest, UserResponse, ValidationRequest};

const VALIDATE_PATH: &str = "/api/users/{userId}/validate";
const REGISTER_PATH: &str = "/api/users/register";

/// Outbound operations against the user-management service.
///
/// Implementations must be safe to share across concurrent calls.
#[async_trait]
pub trait UserServiceClient: Send + Sync {
    /// Ask the user service whether a user id is valid.
    async fn validate(&self, request: &ValidationRequest) -> TransportResult<bool>;

    /// Register a new user.
    async fn register(&self, request: &RegistrationRequest) -> TransportResult<UserResponse>;

    /// Probe the user service's health endpoint.
    async fn health(&self) -> TransportResult<()>;
}

/// Error type for building the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("invalid base URL '{url}': {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// reqwest-backed [`UserServiceClient`].
#[derive(Clone)]
pub struct HttpUserServiceClient {
    client: Client,
    base_url: Url,
    health_path: String,
    timeout_duration: Duration,
}

impl HttpUserServiceClient {
    /// Create a new client from configuration.
    pub fn new(config: &UserServiceConfig) -> Result<Self, ClientBuildError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ClientBuildError::BaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::BaseUrl {
                url: config.base_url.clone(),
                reason: "cannot be used as a base".to_string(),
            });
        }

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()?;

        tracing::info!(
            base_url = %base_url,
            timeout_ms = config.request_timeout_ms,
            "User service client initialized"
        );

        Ok(Self {
            client,
            base_url,
            health_path: config.health_path.clone(),
            timeout_duration: config.request_timeout(),
        })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn validate_url(&self, user_id: &str) -> Url {
        let mut url = self.base_url.clone();
        // Segment-wise push keeps ids containing '/' or '?' inside one segment.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "users", user_id, "validate"]);
        }
        url
    }

    fn join(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base}{path}"));
        url
    }

    /// Run an outbound call under the configured deadline.
    async fn with_deadline<T, F>(&self, fut: F) -> TransportResult<T>
    where
        F: Future<Output = TransportResult<T>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.timeout_duration)),
        }
    }
}

#[async_trait]
impl UserServiceClient for HttpUserServiceClient {
    async fn validate(&self, request: &ValidationRequest) -> TransportResult<bool> {
        let url = self.validate_url(&request.user_id);
        tracing::debug!(endpoint = VALIDATE_PATH, %url, "GET user validation");

        self.with_deadline(async {
            let response = self.client.get(url).send().await.map_err(send_error)?;
            let response = check_status(response).await?;
            response
                .json::<bool>()
                .await
                .map_err(|e| TransportError::Decode(e.to_string()))
        })
        .await
    }

    async fn register(&self, request: &RegistrationRequest) -> TransportResult<UserResponse> {
        let url = self.join(REGISTER_PATH);
        tracing::debug!(endpoint = REGISTER_PATH, %url, "POST user registration");

        self.with_deadline(async {
            let response = self
                .client
                .post(url)
                .json(request)
                .send()
                .await
                .map_err(send_error)?;
            let response = check_status(response).await?;
            response
                .json::<UserResponse>()
                .await
                .map_err(|e| TransportError::Decode(e.to_string()))
        })
        .await
    }

    async fn health(&self) -> TransportResult<()> {
        let url = self.join(&self.health_path);
        self.with_deadline(async {
            let response = self.client.get(url).send().await.map_err(send_error)?;
            check_status(response).await.map(|_| ())
        })
        .await
    }
}

impl std::fmt::Debug for HttpUserServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpUserServiceClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}

fn send_error(e: reqwest::Error) -> TransportError {
    TransportError::Connect(e.to_string())
}

/// Turn a non-success response into [`TransportError::Status`], keeping the
/// body text as the message.
async fn check_status(response: Response) -> TransportResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("error").to_string()
    } else {
        body
    };
    Err(TransportError::Status {
        status: status.as_u16(),
        message,
    })
}
