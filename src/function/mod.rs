//! Edge functions: the invocation contract and the www redirect.

pub mod handler;
pub mod redirect;

pub use handler::{EdgeError, EdgeFunction, FunctionContext};
pub use redirect::WwwRedirect;
