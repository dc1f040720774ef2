//! User-service proxy subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → service.rs (input checks, short-circuit on blank input)
//!     → client.rs (one outbound call, bounded by timeout)
//!     → error.rs (transport failure → ProxyError)
//!     → single result back to the handler
//! ```
//!
//! # Constraints
//! - No transport error crosses the service boundary unclassified
//! - No retries; idempotence is the caller's concern
//! - The client is shared by all concurrent calls

pub mod client;
pub mod error;
pub mod service;
pub mod types;

pub use client::{HttpUserServiceClient, UserServiceClient};
pub use error::{ErrorCode, ProxyError, ProxyResult, TransportError};
pub use service::UserProxyService;
pub use types::{RegistrationRequest, UserResponse, ValidationRequest};
