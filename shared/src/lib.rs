//! Response helpers for Lambda functions behind an API Gateway proxy
//! integration: default headers, an error envelope and one constructor per
//! response outcome.

pub mod configuration;
pub mod envelope;
pub mod error;
pub mod headers;
pub mod response;

pub use envelope::ErrorEnvelope;
pub use error::SerializationError;
pub use headers::{merge_headers, set_default_headers, HeaderMap};
pub use response::{ApiGatewayResponse, Responder};
