use thiserror::Error;

/// A value could not be converted into a JSON response body.
#[derive(Debug, Error)]
#[error("failed to serialize response body: {0}")]
pub struct SerializationError(#[from] serde_json::Error);
