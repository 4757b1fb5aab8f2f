//! Response types for HTTP handlers.

mod error_response;
mod monitors;

pub use error_response::{ErrorDetails, ErrorResponse};
pub use monitors::{Endpoints, HealthStatus, ServiceDescriptor, VERSION};
