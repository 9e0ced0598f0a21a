//! Event sink implementations
//!
//! Concrete implementations of the DeployEventSink port.

mod json;
mod tracing_sink;

pub use json::JsonEventSink;
pub use tracing_sink::TracingEventSink;
