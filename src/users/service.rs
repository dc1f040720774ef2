//! User proxy service: the façade the rest of the gateway calls.
//!
//! Checks inputs locally, delegates to the [`UserServiceClient`], and turns
//! every downstream failure into a [`ProxyError`]. A call resolves to
//! exactly one of the success value or a `ProxyError`.

use std::sync::Arc;

use crate::observability::metrics;
use crate::users::client::UserServiceClient;
use crate::users::error::{classify_register_error, classify_validate_error, ProxyError, ProxyResult};
use crate::users::types::{non_blank, RegistrationRequest, UserResponse, ValidationRequest};

/// Stateless façade over a shared downstream client.
#[derive(Clone)]
pub struct UserProxyService {
    client: Arc<dyn UserServiceClient>,
}

impl UserProxyService {
    pub fn new(client: Arc<dyn UserServiceClient>) -> Self {
        Self { client }
    }

    /// Check a user id against the user service.
    ///
    /// A blank id is rejected with `INVALID_REQUEST` without any network call.
    pub async fn validate_user(&self, user_id: &str) -> ProxyResult<bool> {
        if non_blank(user_id).is_none() {
            return Err(record(ProxyError::invalid_request(
                "User ID cannot be null or empty",
            )));
        }

        tracing::info!(user_id = %user_id, "Calling user validation API");
        let request = ValidationRequest::new(user_id);

        match self.client.validate(&request).await {
            Ok(valid) => {
                metrics::record_downstream_call("validate", "success");
                tracing::info!(user_id = %user_id, valid, "User validation completed");
                Ok(valid)
            }
            Err(e) => {
                metrics::record_downstream_call("validate", "failure");
                tracing::error!(
                    user_id = %user_id,
                    status = ?e.status(),
                    error = %e,
                    "Error validating user"
                );
                Err(record(classify_validate_error(user_id, &e)))
            }
        }
    }

    /// Register a user with the user service.
    ///
    /// A missing or blank email is rejected with `INVALID_REQUEST` without
    /// any network call.
    pub async fn register_user(&self, request: RegistrationRequest) -> ProxyResult<UserResponse> {
        let Some(email) = request.email().map(str::to_owned) else {
            return Err(record(ProxyError::invalid_request(
                "Email cannot be null or empty",
            )));
        };

        tracing::info!(email = %email, "Calling user registration API");

        match self.client.register(&request).await {
            Ok(user) => {
                metrics::record_downstream_call("register", "success");
                tracing::info!(email = %user.email, "User registered");
                Ok(user)
            }
            Err(e) => {
                metrics::record_downstream_call("register", "failure");
                tracing::error!(
                    email = %email,
                    status = ?e.status(),
                    error = %e,
                    "Error registering user"
                );
                Err(record(classify_register_error(&email, &e)))
            }
        }
    }

    /// Readiness of the downstream user service.
    pub async fn downstream_health(&self) -> Result<(), String> {
        self.client.health().await.map_err(|e| e.to_string())
    }
}

fn record(error: ProxyError) -> ProxyError {
    metrics::record_proxy_error(error.code.as_str());
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::error::{ErrorCode, TransportError, TransportResult};
    use async_trait::async_trait;
    use futures_util::future::join_all;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    type Responder<T> = Box<dyn Fn(&str) -> TransportResult<T> + Send + Sync>;

    /// Programmable client counting every outbound call.
    struct MockClient {
        calls: AtomicUsize,
        validate: Responder<bool>,
        register: Responder<UserResponse>,
        registered: Mutex<Vec<RegistrationRequest>>,
    }

    impl MockClient {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                validate: Box::new(|_| Ok(true)),
                register: Box::new(|email| {
                    Ok(UserResponse {
                        email: email.to_string(),
                        fields: Default::default(),
                    })
                }),
                registered: Mutex::new(Vec::new()),
            }
        }

        fn on_validate(
            mut self,
            f: impl Fn(&str) -> TransportResult<bool> + Send + Sync + 'static,
        ) -> Self {
            self.validate = Box::new(f);
            self
        }

        fn on_register(
            mut self,
            f: impl Fn(&str) -> TransportResult<UserResponse> + Send + Sync + 'static,
        ) -> Self {
            self.register = Box::new(f);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserServiceClient for MockClient {
        async fn validate(&self, request: &ValidationRequest) -> TransportResult<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Yield so concurrent calls genuinely interleave.
            tokio::time::sleep(Duration::from_millis(1)).await;
            (self.validate)(&request.user_id)
        }

        async fn register(&self, request: &RegistrationRequest) -> TransportResult<UserResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.registered.lock().unwrap().push(request.clone());
            (self.register)(request.email.as_deref().unwrap_or_default())
        }

        async fn health(&self) -> TransportResult<()> {
            Ok(())
        }
    }

    fn status(code: u16) -> TransportError {
        TransportError::Status {
            status: code,
            message: "boom".into(),
        }
    }

    fn service(mock: MockClient) -> (UserProxyService, Arc<MockClient>) {
        let mock = Arc::new(mock);
        (UserProxyService::new(mock.clone()), mock)
    }

    #[tokio::test]
    async fn test_blank_user_id_short_circuits() {
        let (svc, mock) = service(MockClient::new());

        for user_id in ["", " ", "\t\n", "   "] {
            let err = svc.validate_user(user_id).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidRequest);
            assert_eq!(err.http_status, 400);
        }
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_or_blank_email_short_circuits() {
        let (svc, mock) = service(MockClient::new());

        let requests = [
            RegistrationRequest::default(),
            RegistrationRequest::new(""),
            RegistrationRequest::new("   ").with_field("firstName", "Ada"),
        ];
        for request in requests {
            let err = svc.register_user(request).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidRequest);
            assert_eq!(err.http_status, 400);
        }
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_validate_success() {
        let (svc, mock) = service(MockClient::new().on_validate(|id| Ok(id == "u3")));

        assert!(svc.validate_user("u3").await.unwrap());
        assert!(!svc.validate_user("other").await.unwrap());
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_validate_not_found() {
        let (svc, _) = service(MockClient::new().on_validate(|_| Err(status(404))));

        let err = svc.validate_user("u1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
        assert_eq!(err.http_status, 404);
        assert!(err.message.contains("u1"));
    }

    #[tokio::test]
    async fn test_validate_unauthorized() {
        let (svc, _) = service(MockClient::new().on_validate(|_| Err(status(401))));

        let err = svc.validate_user("u2").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.http_status, 401);
    }

    #[tokio::test]
    async fn test_validate_connection_failure_is_unknown() {
        let (svc, mock) = service(
            MockClient::new().on_validate(|_| Err(TransportError::Connect("refused".into()))),
        );

        let err = svc.validate_user("u1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownError);
        assert_eq!(err.http_status, 500);
        // surfaced once, never retried
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_register_success_passes_fields_through() {
        let (svc, mock) = service(MockClient::new().on_register(|email| {
            Ok(UserResponse {
                email: email.to_string(),
                fields: json!({ "id": "42" }).as_object().cloned().unwrap_or_default(),
            })
        }));

        let request = RegistrationRequest::new("ada@example.com")
            .with_field("firstName", "Ada")
            .with_field("password", "secret");
        let user = svc.register_user(request.clone()).await.unwrap();

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.fields["id"], json!("42"));
        assert_eq!(mock.registered.lock().unwrap().as_slice(), &[request]);
    }

    #[tokio::test]
    async fn test_register_server_error_and_connect_failure() {
        let failures: [fn() -> TransportError; 3] = [
            || status(500),
            || TransportError::Connect("connection refused".into()),
            || TransportError::Timeout(Duration::from_secs(5)),
        ];
        for failure in failures {
            let (svc, mock) = service(MockClient::new().on_register(move |_| Err(failure())));
            let err = svc
                .register_user(RegistrationRequest::new("ada@example.com"))
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::UnknownError);
            assert_eq!(err.http_status, 500);
            assert_eq!(mock.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_register_bad_request() {
        let (svc, _) = service(MockClient::new().on_register(|_| Err(status(400))));

        let err = svc
            .register_user(RegistrationRequest::new("ada@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert!(err.message.contains("ada@example.com"));
    }

    #[tokio::test]
    async fn test_register_not_found_is_unknown() {
        let (svc, _) = service(MockClient::new().on_register(|_| Err(status(404))));

        let err = svc
            .register_user(RegistrationRequest::new("ada@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownError);
    }

    #[tokio::test]
    async fn test_concurrent_validations_do_not_interfere() {
        let (svc, mock) = service(MockClient::new().on_validate(|id| {
            let n: u32 = id.trim_start_matches('u').parse().unwrap_or(0);
            match n % 3 {
                0 => Ok(true),
                1 => Err(status(404)),
                _ => Err(status(401)),
            }
        }));

        let ids: Vec<String> = (0..60).map(|i| format!("u{i}")).collect();
        let results = join_all(ids.iter().map(|id| svc.validate_user(id))).await;

        for (i, (id, result)) in ids.iter().zip(results).enumerate() {
            match i % 3 {
                0 => assert_eq!(result, Ok(true)),
                1 => {
                    let err = result.unwrap_err();
                    assert_eq!(err.code, ErrorCode::UserNotFound);
                    assert!(err.message.ends_with(id.as_str()), "{} vs {id}", err.message);
                }
                _ => assert_eq!(result.unwrap_err().code, ErrorCode::Unauthorized),
            }
        }
        assert_eq!(mock.calls(), 60);
    }
}
