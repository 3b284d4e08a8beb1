use crate::envelope::ErrorEnvelope;
use crate::error::SerializationError;
use crate::headers::{default_headers, merge_headers, HeaderMap};
use lambda_http::http::StatusCode;
use lambda_http::{tracing, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_OK: &str = "ok";
const DEFAULT_CREATED: &str = "resource created";
const DEFAULT_BAD_REQUEST: &str = "bad request";
const DEFAULT_UNAUTHORIZED: &str = "unauthorized to access this resource";
const DEFAULT_FORBIDDEN: &str = "forbidden to access this resource";
const DEFAULT_NOT_FOUND: &str = "resource not found";
const DEFAULT_CONFLICT: &str = "there is a conflict with the resource";
const DEFAULT_GENERIC_SERVER: &str = "generic server error";

/// API Gateway proxy integration response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayResponse {
    pub status_code: u16,
    pub headers: HeaderMap,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl TryFrom<ApiGatewayResponse> for Response<String> {
    type Error = lambda_http::http::Error;

    fn try_from(response: ApiGatewayResponse) -> Result<Self, Self::Error> {
        let mut builder = Response::builder().status(response.status_code);
        for (name, value) in &response.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder.body(response.body)
    }
}

/// Builds responses on top of a fixed set of default headers.
///
/// Headers passed to a constructor are merged over the defaults, so a
/// caller-supplied value wins on a shared key.
#[derive(Debug, Clone, Default)]
pub struct Responder {
    default_headers: Arc<HeaderMap>,
}

impl Responder {
    pub fn new(default_headers: HeaderMap) -> Self {
        Self {
            default_headers: Arc::new(default_headers),
        }
    }

    /// Snapshot of the process-wide defaults at the time of the call.
    pub fn from_defaults() -> Self {
        Self {
            default_headers: default_headers(),
        }
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub fn ok(&self, message: Option<&str>, headers: Option<&HeaderMap>) -> ApiGatewayResponse {
        self.respond_message(StatusCode::OK, or_default(message, DEFAULT_OK), headers)
    }

    pub fn created(
        &self,
        message: Option<&str>,
        headers: Option<&HeaderMap>,
    ) -> ApiGatewayResponse {
        self.respond_message(
            StatusCode::CREATED,
            or_default(message, DEFAULT_CREATED),
            headers,
        )
    }

    /// Like [`Responder::ok`], but the message is JSON-encoded instead of
    /// interpolated, so quotes and backslashes are escaped. The body has no
    /// space after the colon: `{"message":"ok"}`.
    pub fn ok_escaped(
        &self,
        message: Option<&str>,
        headers: Option<&HeaderMap>,
    ) -> ApiGatewayResponse {
        let body = serde_json::json!({ "message": or_default(message, DEFAULT_OK) }).to_string();
        self.build(StatusCode::OK, body, headers)
    }

    pub fn bad_request(
        &self,
        message: Option<&str>,
        headers: Option<&HeaderMap>,
    ) -> ApiGatewayResponse {
        self.respond_canned_error(StatusCode::BAD_REQUEST, message, DEFAULT_BAD_REQUEST, headers)
    }

    pub fn unauthorized(
        &self,
        message: Option<&str>,
        headers: Option<&HeaderMap>,
    ) -> ApiGatewayResponse {
        self.respond_canned_error(
            StatusCode::UNAUTHORIZED,
            message,
            DEFAULT_UNAUTHORIZED,
            headers,
        )
    }

    pub fn forbidden(
        &self,
        message: Option<&str>,
        headers: Option<&HeaderMap>,
    ) -> ApiGatewayResponse {
        self.respond_canned_error(StatusCode::FORBIDDEN, message, DEFAULT_FORBIDDEN, headers)
    }

    pub fn not_found(
        &self,
        message: Option<&str>,
        headers: Option<&HeaderMap>,
    ) -> ApiGatewayResponse {
        self.respond_canned_error(StatusCode::NOT_FOUND, message, DEFAULT_NOT_FOUND, headers)
    }

    pub fn conflict(
        &self,
        message: Option<&str>,
        headers: Option<&HeaderMap>,
    ) -> ApiGatewayResponse {
        self.respond_canned_error(StatusCode::CONFLICT, message, DEFAULT_CONFLICT, headers)
    }

    pub fn generic_server_error(
        &self,
        message: Option<&str>,
        headers: Option<&HeaderMap>,
    ) -> ApiGatewayResponse {
        self.respond_canned_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            DEFAULT_GENERIC_SERVER,
            headers,
        )
    }

    /// Serializes `payload` as the body. Unlike the status-specific
    /// constructors, a payload that can't be serialized is returned as an
    /// error instead of a degraded body.
    pub fn respond_with(
        &self,
        status: StatusCode,
        payload: &impl Serialize,
        headers: Option<&HeaderMap>,
    ) -> Result<ApiGatewayResponse, SerializationError> {
        let body = serde_json::to_string(payload).map_err(|e| {
            tracing::error!("Failed to serialize {} response payload: {:?}", status, e);
            SerializationError::from(e)
        })?;
        Ok(self.build(status, body, headers))
    }

    /// Wraps `message` in `{"message": "..."}` by plain interpolation.
    ///
    /// The message is not escaped: a double quote or backslash in it
    /// produces a body that is not valid JSON. Use [`Responder::ok_escaped`]
    /// for untrusted text.
    pub fn respond_message(
        &self,
        status: StatusCode,
        message: &str,
        headers: Option<&HeaderMap>,
    ) -> ApiGatewayResponse {
        self.build(status, format!("{{\"message\": \"{}\"}}", message), headers)
    }

    /// Never fails: if the envelope can't be serialized the body falls back
    /// to a fixed template built from the reason phrase and the detail.
    ///
    /// Extensions are stored as `serde_json::Value`, which always
    /// serializes, so the fallback only matters if an extension ever holds
    /// a type that is serialized lazily.
    pub fn respond_error(
        &self,
        status: StatusCode,
        envelope: &ErrorEnvelope,
        headers: Option<&HeaderMap>,
    ) -> ApiGatewayResponse {
        let body = error_body(status, envelope, envelope.to_json());
        self.build(status, body, headers)
    }

    fn respond_canned_error(
        &self,
        status: StatusCode,
        message: Option<&str>,
        default_detail: &str,
        headers: Option<&HeaderMap>,
    ) -> ApiGatewayResponse {
        let envelope = ErrorEnvelope::new(reason(status), or_default(message, default_detail));
        self.respond_error(status, &envelope, headers)
    }

    fn build(
        &self,
        status: StatusCode,
        body: String,
        headers: Option<&HeaderMap>,
    ) -> ApiGatewayResponse {
        let headers = match headers {
            Some(extra) => merge_headers(&[&self.default_headers, extra]),
            None => merge_headers(&[&self.default_headers]),
        };
        ApiGatewayResponse {
            status_code: status.as_u16(),
            headers,
            body,
            is_base64_encoded: false,
        }
    }
}

fn or_default<'a>(message: Option<&'a str>, default: &'a str) -> &'a str {
    match message {
        Some(message) if !message.is_empty() => message,
        _ => default,
    }
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or_default()
}

fn error_body(
    status: StatusCode,
    envelope: &ErrorEnvelope,
    serialized: Result<String, SerializationError>,
) -> String {
    match serialized {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to serialize error envelope, using fallback body: {:?}", e);
            format!(
                "{{ \"title\": \"{}\" \"detail\": \"{}\"}}",
                reason(status),
                envelope.detail
            )
        }
    }
}

pub fn respond_ok(message: Option<&str>, headers: Option<&HeaderMap>) -> ApiGatewayResponse {
    Responder::from_defaults().ok(message, headers)
}

pub fn respond_created(message: Option<&str>, headers: Option<&HeaderMap>) -> ApiGatewayResponse {
    Responder::from_defaults().created(message, headers)
}

pub fn respond_bad_request(
    message: Option<&str>,
    headers: Option<&HeaderMap>,
) -> ApiGatewayResponse {
    Responder::from_defaults().bad_request(message, headers)
}

pub fn respond_unauthorized(
    message: Option<&str>,
    headers: Option<&HeaderMap>,
) -> ApiGatewayResponse {
    Responder::from_defaults().unauthorized(message, headers)
}

pub fn respond_forbidden(message: Option<&str>, headers: Option<&HeaderMap>) -> ApiGatewayResponse {
    Responder::from_defaults().forbidden(message, headers)
}

pub fn respond_not_found(message: Option<&str>, headers: Option<&HeaderMap>) -> ApiGatewayResponse {
    Responder::from_defaults().not_found(message, headers)
}

pub fn respond_conflict(message: Option<&str>, headers: Option<&HeaderMap>) -> ApiGatewayResponse {
    Responder::from_defaults().conflict(message, headers)
}

pub fn respond_generic_server_error(
    message: Option<&str>,
    headers: Option<&HeaderMap>,
) -> ApiGatewayResponse {
    Responder::from_defaults().generic_server_error(message, headers)
}

pub fn respond_with(
    status: StatusCode,
    payload: &impl Serialize,
    headers: Option<&HeaderMap>,
) -> Result<ApiGatewayResponse, SerializationError> {
    Responder::from_defaults().respond_with(status, payload, headers)
}
