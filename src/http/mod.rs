//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (request ID assigned or kept)
//!     → server.rs (Axum router, trace span, timeout)
//!     → middleware/access_log.rs (log in, metrics + log out)
//!     → middleware/api_version.rs (/api only)
//!     → handlers.rs → users::UserProxyService
//!     → JSON body or ProxyError body back to the client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
