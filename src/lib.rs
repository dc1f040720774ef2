//! User gateway library.
//!
//! Forwards user validation and registration requests to the downstream
//! user-management service and translates its failures into a stable
//! error taxonomy (`users::ErrorCode`).

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod users;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use users::{HttpUserServiceClient, ProxyError, UserProxyService};
