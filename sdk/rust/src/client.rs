use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

/// Error body returned by the gateway for every failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub error_code: String,
    pub message: String,
    pub status: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// The gateway answered with a classified error.
    #[error("{} ({}): {}", .0.error_code, .0.status, .0.message)]
    Api(ApiError),

    /// Non-success status whose body is not an error document.
    #[error("gateway returned status {status}: {body}")]
    Unexpected { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid gateway URL '{0}'")]
    InvalidUrl(String),
}

impl SdkError {
    /// Machine-readable code, when the gateway supplied one.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            SdkError::Api(e) => Some(&e.error_code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RegisterRequest {
    pub fn new(email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            fields: Map::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub email: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

pub struct GatewayClient {
    client: Client,
    gateway_url: String,
    api_version: Option<String>,
}

impl GatewayClient {
    pub fn new(gateway_url: &str) -> Self {
        Self {
            client: Client::new(),
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            api_version: None,
        }
    }

    /// Send `API-Version` on every call.
    pub fn with_api_version(mut self, version: &str) -> Self {
        self.api_version = Some(version.to_string());
        self
    }

    /// Ask the gateway whether a user id is valid.
    pub async fn validate_user(&self, user_id: &str) -> Result<bool, SdkError> {
        let url = self.endpoint(&["api", "users", user_id, "validate"])?;
        let resp = self.versioned(self.client.get(url)).send().await?;
        decode(resp).await
    }

    /// Register a user through the gateway.
    pub async fn register_user(&self, req: &RegisterRequest) -> Result<RegisteredUser, SdkError> {
        let url = self.endpoint(&["api", "users", "register"])?;
        let builder = self.client.post(url).json(req);
        let resp = self.versioned(builder).send().await?;
        decode(resp).await
    }

    /// Append escaped path segments to the gateway URL, so an id holding
    /// `/`, `?` or `%` stays a single segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SdkError> {
        let invalid = || SdkError::InvalidUrl(self.gateway_url.clone());
        let mut url = Url::parse(&self.gateway_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn versioned(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_version {
            Some(v) => req.header("API-Version", v),
            None => req,
        }
    }
}

async fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, SdkError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }

    let body = resp.text().await?;
    match serde_json::from_str::<ApiError>(&body) {
        Ok(api) => Err(SdkError::Api(api)),
        Err(_) => Err(SdkError::Unexpected {
            status: status.as_u16(),
            body,
        }),
    }
}
