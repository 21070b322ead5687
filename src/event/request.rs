//! Viewer request records as delivered by the edge runtime.

use crate::event::query::{QueryString, QueryValue};
use crate::function::EdgeError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A header value record: `{"value": "..."}`.
///
/// A repeated header also carries `{"multiValue": [{"value": ...}, ...]}`
/// holding every occurrence, the first one included. The same record shape
/// is used for the items of querystring `multiValue` lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderValue {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value: Option<Vec<HeaderValue>>,
}

impl HeaderValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            multi_value: None,
        }
    }

    /// A repeated header. `value` mirrors the first occurrence.
    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<HeaderValue> = values.into_iter().map(HeaderValue::new).collect();
        Self {
            value: values.first().map(|v| v.value.clone()).unwrap_or_default(),
            multi_value: Some(values),
        }
    }

    /// Record another occurrence of this header.
    pub fn push(&mut self, value: impl Into<String>) {
        let value = HeaderValue::new(value);
        match self.multi_value.as_mut() {
            Some(values) => values.push(value),
            None => {
                let first = HeaderValue::new(self.value.clone());
                self.multi_value = Some(vec![first, value]);
            }
        }
    }

    /// Every value of the header in order: the `multiValue` list when it is
    /// non-empty, otherwise just `value`.
    pub fn values(&self) -> Vec<&str> {
        match self.multi_value.as_deref() {
            Some(values) if !values.is_empty() => {
                values.iter().map(|v| v.value.as_str()).collect()
            }
            _ => vec![self.value.as_str()],
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Header records keyed by (normally lower-cased) header name, in the order
/// the runtime sent them.
pub type Headers = IndexMap<String, HeaderValue>;

/// Inbound request handed to an edge function.
///
/// Fields the runtime sends that this crate does not interpret (cookies,
/// for instance) are kept in `extra` and written back unchanged, so a
/// pass-through returns the same object the runtime supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Request path, without query string.
    pub uri: String,
    #[serde(default)]
    pub headers: Headers,
    #[serde(default)]
    pub querystring: QueryString,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EdgeRequest {
    /// Create a request for the given path with no headers or parameters.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            method: None,
            uri: uri.into(),
            headers: Headers::new(),
            querystring: QueryString::new(),
            extra: Map::new(),
        }
    }

    /// Set the HTTP method.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Add a header record.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), HeaderValue::new(value));
        self
    }

    /// Add a single-valued query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.querystring.insert(name.into(), QueryValue::single(value));
        self
    }

    /// Add a query parameter carrying several values.
    pub fn multi_query<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.querystring.insert(name.into(), QueryValue::multi(values));
        self
    }

    /// Value of the `host` header record.
    ///
    /// The lookup uses the exact key `host`, which is how edge runtimes
    /// name it.
    pub fn host(&self) -> Result<&str, EdgeError> {
        self.headers
            .get("host")
            .map(|h| h.value.as_str())
            .ok_or(EdgeError::MissingHostHeader)
    }
}

/// Event envelope passed to an edge function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeEvent {
    pub request: EdgeRequest,
    /// Runtime metadata (version, context, viewer, ...), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EdgeEvent {
    pub fn new(request: EdgeRequest) -> Self {
        Self {
            request,
            extra: Map::new(),
        }
    }
}
