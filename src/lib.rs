//! # www-redirect - bare domain to `www.` edge redirect
//!
//! An edge function that answers requests for a bare domain (`example.com`)
//! with a `302 Found` pointing at the `www.` variant of the same URL, keeping
//! the path, the query string and the request headers. Requests for any
//! other host are handed back untouched so the runtime forwards them.
//!
//! ## Architecture
//!
//! ```text
//!   edge runtime / local EdgeHost
//!            │  EdgeEvent { request }
//!            ▼
//!   ┌──────────────────────────────┐
//!   │  WwwRedirect (EdgeFunction)  │
//!   │    host == domain ?          │──── no ───▶ HandlerOutput::Request (unchanged)
//!   │        │ yes                 │
//!   │        ▼                     │
//!   │  serialize_query(querystring)│
//!   └──────────────────────────────┘
//!            │
//!            ▼
//!   HandlerOutput::Response { 302, "Found", headers - host + location }
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use www_redirect::prelude::*;
//!
//! let redirect = WwwRedirect::new("example.com");
//! let request = EdgeRequest::new("/p")
//!     .header("host", "example.com")
//!     .query("q", "1");
//!
//! let output = redirect.redirect(request).unwrap();
//! let response = output.as_response().unwrap();
//! assert_eq!(response.location(), Some("https://www.example.com/p?q=1"));
//! ```
//!
//! The same function can be served over HTTP for local testing:
//!
//! ```rust,no_run
//! use www_redirect::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = HostConfig::new().port(8080).domain("example.com");
//!     EdgeHost::www_redirect(config).await?.run().await
//! }
//! ```

pub mod event;
pub mod function;
pub mod runtime;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::event::{
        parse_query, serialize_query, EdgeEvent, EdgeRequest, EdgeResponse, HandlerOutput,
        HeaderValue, Headers, QueryString, QueryValue, StatusCode,
    };
    pub use crate::function::{EdgeError, EdgeFunction, FunctionContext, WwwRedirect};
    pub use crate::runtime::{run_event_io, run_event_json, EdgeHost, HostConfig};
    pub use async_trait::async_trait;
}

// Re-export for convenience
pub use event::{EdgeEvent, EdgeRequest, EdgeResponse, HandlerOutput};
pub use function::{EdgeError, EdgeFunction, FunctionContext, WwwRedirect};
pub use runtime::{EdgeHost, HostConfig};
