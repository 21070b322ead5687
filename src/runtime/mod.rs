//! Local edge host - runs an edge function behind a plain HTTP listener.

mod config;
mod runner;
mod server;

pub use config::HostConfig;
pub use runner::{run_event_io, run_event_json};
pub use server::{to_event, EdgeHost};
