//! Edge function results: a generated response or the forwarded request.

use crate::event::request::{EdgeRequest, HeaderValue, Headers};
use serde::{Deserialize, Serialize};

/// HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const FOUND: StatusCode = StatusCode(302);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    /// Check if the status code indicates a redirection (3xx).
    pub fn is_redirection(&self) -> bool {
        (300..400).contains(&self.0)
    }

    /// Check if the status code indicates a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl From<StatusCode> for u16 {
    fn from(code: StatusCode) -> Self {
        code.0
    }
}

/// Response generated at the edge instead of contacting the origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeResponse {
    pub status_code: StatusCode,
    pub status_description: String,
    #[serde(default)]
    pub headers: Headers,
}

impl EdgeResponse {
    /// Create a response with no headers.
    pub fn new(status: impl Into<StatusCode>, description: impl Into<String>) -> Self {
        Self {
            status_code: status.into(),
            status_description: description.into(),
            headers: Headers::new(),
        }
    }

    /// `302 Found` carrying the given headers.
    pub fn found(headers: Headers) -> Self {
        Self {
            headers,
            ..Self::new(StatusCode::FOUND, "Found")
        }
    }

    /// Set a header, replacing any existing record with the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), HeaderValue::new(value));
        self
    }

    /// Get a header value.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|h| h.value.as_str())
    }

    /// The `location` header, if set.
    pub fn location(&self) -> Option<&str> {
        self.get_header("location")
    }
}

/// What an edge function hands back to the runtime.
///
/// Encoded without a tag: the runtime tells the two apart by shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HandlerOutput {
    /// Answer the viewer directly.
    Response(EdgeResponse),
    /// Continue to the origin with this request.
    Request(EdgeRequest),
}

impl HandlerOutput {
    pub fn is_response(&self) -> bool {
        matches!(self, HandlerOutput::Response(_))
    }

    pub fn as_response(&self) -> Option<&EdgeResponse> {
        match self {
            HandlerOutput::Response(response) => Some(response),
            HandlerOutput::Request(_) => None,
        }
    }

    pub fn as_request(&self) -> Option<&EdgeRequest> {
        match self {
            HandlerOutput::Request(request) => Some(request),
            HandlerOutput::Response(_) => None,
        }
    }
}

impl From<EdgeResponse> for HandlerOutput {
    fn from(response: EdgeResponse) -> Self {
        HandlerOutput::Response(response)
    }
}

impl From<EdgeRequest> for HandlerOutput {
    fn from(request: EdgeRequest) -> Self {
        HandlerOutput::Request(request)
    }
}
