//! Edge function trait, invocation context and error type.

use crate::event::{EdgeEvent, HandlerOutput, StatusCode};
use async_trait::async_trait;

/// Per-invocation context for edge functions.
#[derive(Debug, Clone, Default)]
pub struct FunctionContext {
    /// Function name.
    pub function_name: String,
    /// Request ID for tracing.
    pub request_id: String,
}

impl FunctionContext {
    /// Create a new function context.
    pub fn new(function_name: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            request_id: request_id.into(),
        }
    }

    /// Context for a fresh invocation, with a generated request ID.
    pub fn for_invocation(function_name: impl Into<String>) -> Self {
        Self::new(function_name, generate_request_id())
    }
}

/// A function invoked by the edge runtime for each viewer request.
///
/// The runtime calls [`on_load`](Self::on_load) once before the first
/// event, then [`handle`](Self::handle) once per event.
#[async_trait]
pub trait EdgeFunction: Send + Sync {
    /// Called when the function is loaded into the runtime.
    async fn on_load(&mut self, ctx: &FunctionContext) -> Result<(), EdgeError> {
        let _ = ctx;
        Ok(())
    }

    /// Inspect an event and either answer it or forward its request.
    async fn handle(
        &self,
        event: EdgeEvent,
        ctx: &FunctionContext,
    ) -> Result<HandlerOutput, EdgeError>;

    /// Get the function name.
    fn name(&self) -> &str;
}

/// Edge function error type.
#[derive(Debug, thiserror::Error)]
pub enum EdgeError {
    /// The request carries no `host` header record.
    #[error("request has no host header")]
    MissingHostHeader,
    #[error("invalid event: {0}")]
    InvalidEvent(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EdgeError {
    /// HTTP status used when the fault is reported to a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            EdgeError::MissingHostHeader | EdgeError::InvalidEvent(_) => StatusCode::BAD_REQUEST,
            EdgeError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Generate a unique request ID.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{:x}", timestamp)
}
