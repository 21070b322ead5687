//! Edge event types: the records an edge runtime exchanges with a function.

mod query;
mod request;
mod response;

pub use query::{parse_query, serialize_query, QueryString, QueryValue};
pub use request::{EdgeEvent, EdgeRequest, HeaderValue, Headers};
pub use response::{EdgeResponse, HandlerOutput, StatusCode};
