pub mod access_log;
pub mod api_version;

pub use access_log::access_log;
pub use api_version::{api_version, ApiVersion, ApiVersionSettings};
