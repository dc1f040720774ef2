//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    http::{header, Method, StatusCode, Uri},
    Router,
};
use tokio::net::TcpListener;
use user_gateway::config::GatewayConfig;
use user_gateway::{HttpServer, HttpUserServiceClient, Shutdown, UserProxyService};

/// A request as seen by the mock user service.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Seen {
    pub method: Method,
    pub path: String,
    pub body: Bytes,
}

/// Handle to a running mock user service.
pub struct MockBackend {
    pub addr: SocketAddr,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Start a programmable mock user service on an ephemeral port.
///
/// Every request is handed to `f`, which returns the status and JSON body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockBackend
where
    F: Fn(Seen) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    let f = Arc::new(f);
    let counter = calls.clone();
    let app = Router::new().fallback(move |method: Method, uri: Uri, body: Bytes| {
        let f = f.clone();
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            let seen = Seen {
                method,
                path: uri.path().to_string(),
                body,
            };
            let (status, body) = f(seen).await;
            (
                StatusCode::from_u16(status).unwrap(),
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
        }
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, calls }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start the gateway against `user_service_url`; returns its base URL.
#[allow(dead_code)]
pub async fn start_gateway(user_service_url: &str, shutdown: &Shutdown) -> String {
    let mut config = GatewayConfig::default();
    config.user_service.base_url = user_service_url.to_string();
    config.user_service.request_timeout_ms = 1_000;

    let client = HttpUserServiceClient::new(&config.user_service).unwrap();
    let users = UserProxyService::new(Arc::new(client));
    let server = HttpServer::new(config, users);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    format!("http://{}", addr)
}
