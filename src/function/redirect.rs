//! Bare-domain to `www.` redirect.

use crate::event::{
    serialize_query, EdgeEvent, EdgeRequest, EdgeResponse, HandlerOutput, HeaderValue, Headers,
};
use crate::function::{EdgeError, EdgeFunction, FunctionContext};
use async_trait::async_trait;
use tracing::{debug, info};

/// Redirects requests for `domain` to `https://www.<domain>`, keeping the
/// path, query string and headers. Every other host passes through.
#[derive(Debug, Clone)]
pub struct WwwRedirect {
    domain: String,
}

impl WwwRedirect {
    pub const NAME: &'static str = "www-redirect";

    /// Create a redirect for the given bare domain, e.g. `example.com`.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Decide on a single request.
    ///
    /// Returns the request untouched unless its `host` header equals the
    /// configured domain, in which case a `302 Found` is built whose headers
    /// are the request's headers minus `host`, plus `location`.
    pub fn redirect(&self, request: EdgeRequest) -> Result<HandlerOutput, EdgeError> {
        let host = request.host()?;
        if host != self.domain {
            debug!("Passing through request for host {}", host);
            return Ok(HandlerOutput::Request(request));
        }

        let location = self.location(&request);
        debug!("Redirecting {} to {}", request.uri, location);

        let mut headers: Headers = request
            .headers
            .into_iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("host"))
            .collect();
        headers.insert("location".to_string(), HeaderValue::new(location));

        Ok(HandlerOutput::Response(EdgeResponse::found(headers)))
    }

    fn location(&self, request: &EdgeRequest) -> String {
        if request.querystring.is_empty() {
            format!("https://www.{}{}", self.domain, request.uri)
        } else {
            format!(
                "https://www.{}{}?{}",
                self.domain,
                request.uri,
                serialize_query(&request.querystring)
            )
        }
    }
}

#[async_trait]
impl EdgeFunction for WwwRedirect {
    async fn on_load(&mut self, ctx: &FunctionContext) -> Result<(), EdgeError> {
        info!(
            "Loading function: {} (redirecting {} to www.{})",
            ctx.function_name, self.domain, self.domain
        );
        Ok(())
    }

    async fn handle(
        &self,
        event: EdgeEvent,
        ctx: &FunctionContext,
    ) -> Result<HandlerOutput, EdgeError> {
        debug!("Handling {} [{}]", event.request.uri, ctx.request_id);
        self.redirect(event.request)
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}
