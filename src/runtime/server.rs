//! Local edge host HTTP server.

use crate::event::{parse_query, EdgeEvent, EdgeRequest, HandlerOutput, HeaderValue, Headers};
use crate::function::{EdgeError, EdgeFunction, FunctionContext, WwwRedirect};
use crate::runtime::HostConfig;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::header::{self, HeaderValue as HttpHeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Local stand-in for an edge runtime.
///
/// Every HTTP request is converted into an edge event and handed to the
/// function. Generated responses are sent to the client as-is; forwarded
/// requests are echoed back as JSON, since there is no origin behind the
/// host.
pub struct EdgeHost {
    /// Host configuration.
    config: HostConfig,
    /// The loaded function.
    function: Arc<dyn EdgeFunction>,
}

impl EdgeHost {
    /// Wrap a function that is already loaded.
    pub fn new(config: HostConfig, function: Arc<dyn EdgeFunction>) -> Self {
        Self { config, function }
    }

    /// Run the function's load hook, then wrap it.
    pub async fn load(
        config: HostConfig,
        mut function: Box<dyn EdgeFunction>,
    ) -> Result<Self, EdgeError> {
        let ctx = FunctionContext::for_invocation(function.name());
        function.on_load(&ctx).await?;
        Ok(Self::new(config, Arc::from(function)))
    }

    /// Load a [`WwwRedirect`] for the configured domain.
    pub async fn www_redirect(config: HostConfig) -> Result<Self, EdgeError> {
        let function = WwwRedirect::new(config.domain.clone());
        Self::load(config, Box::new(function)).await
    }

    /// Get the host configuration.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Bind the configured address and serve until an accept error.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = self.config.bind_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!(
            "Edge host listening on {} (function: {})",
            listener.local_addr()?,
            self.function.name()
        );

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);

            let function = self.function.clone();
            let config = self.config.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let function = function.clone();
                    let config = config.clone();
                    async move { handle_request(req, function, config, remote_addr).await }
                });

                if let Err(err) = http1::Builder::new()
                    .serve_connection(io, service)
                    .await
                {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

/// Handle an incoming HTTP request.
async fn handle_request(
    req: Request<Incoming>,
    function: Arc<dyn EdgeFunction>,
    config: HostConfig,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let path = req.uri().path().to_string();
    let ctx = FunctionContext::for_invocation(function.name());

    debug!(
        "Handling request: {} {} from {} [{}]",
        req.method(),
        path,
        remote_addr,
        ctx.request_id
    );

    if config.enable_health && path == "/_health" {
        return Ok(text_response(StatusCode::OK, "OK"));
    }

    let event = to_event(&req);
    match function.handle(event, &ctx).await {
        Ok(output) => Ok(render_output(output)),
        Err(e) => {
            warn!(
                "Function '{}' error: {} [{}]",
                function.name(),
                e,
                ctx.request_id
            );
            Ok(render_error(&e))
        }
    }
}

/// Convert an HTTP request into an edge event.
///
/// Header names arrive lower-cased; a repeated header becomes one record
/// with a `multiValue` list.
/// The query string is split into records without any decoding.
pub fn to_event<B>(req: &Request<B>) -> EdgeEvent {
    let mut headers = Headers::new();
    for (name, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            match headers.get_mut(name.as_str()) {
                Some(existing) => existing.push(v),
                None => {
                    headers.insert(name.as_str().to_string(), HeaderValue::new(v));
                }
            }
        }
    }

    let request = EdgeRequest {
        method: Some(req.method().to_string()),
        uri: req.uri().path().to_string(),
        headers,
        querystring: req.uri().query().map(parse_query).unwrap_or_default(),
        extra: Default::default(),
    };
    EdgeEvent::new(request)
}

/// Build an HTTP response from a function's output.
fn render_output(output: HandlerOutput) -> Response<Full<Bytes>> {
    match output {
        HandlerOutput::Response(response) => {
            let status = StatusCode::from_u16(response.status_code.0).unwrap_or_else(|_| {
                warn!(
                    "Invalid status code {}, falling back to 500 Internal Server Error",
                    response.status_code.0
                );
                StatusCode::INTERNAL_SERVER_ERROR
            });

            let mut builder = Response::builder().status(status);
            for (name, value) in &response.headers {
                for v in value.values() {
                    builder = builder.header(name.as_str(), v);
                }
            }

            builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
                error!("Function returned an invalid response: {}", e);
                text_response(StatusCode::INTERNAL_SERVER_ERROR, "Invalid function response")
            })
        }
        HandlerOutput::Request(request) => match serde_json::to_vec(&request) {
            Ok(body) => {
                let mut response = Response::new(Full::new(Bytes::from(body)));
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HttpHeaderValue::from_static("application/json"),
                );
                response
            }
            Err(e) => text_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        },
    }
}

fn render_error(err: &EdgeError) -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(err.status_code().0)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    text_response(status, err.to_string())
}

fn text_response(status: StatusCode, message: impl Into<String>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(message.into())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HttpHeaderValue::from_static("text/plain"));
    response
}
