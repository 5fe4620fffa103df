//! Logging and tracing for the Vertex AI client.
//!
//! Both concerns sit behind traits so callers can plug in their own
//! backends; the defaults emit `tracing` events.
//!
//! ```rust
//! use integrations_vertexai::observability::{Tracer, TracingTracer, SpanStatus};
//!
//! let tracer = TracingTracer::new("vertexai");
//! let mut span = tracer.start_span("vertexai.content.stream");
//!
//! span.set_attribute("model", "gemini-pro");
//! span.set_status(SpanStatus::Ok);
//! span.end();
//! ```

pub mod logging;
pub mod tracing;

use std::sync::Arc;

pub use logging::{Logger, NoopLogger, StructuredLogger};
pub use tracing::{DefaultTracer, Span, SpanStatus, Tracer, TracingSpan, TracingTracer};

use crate::config::LogLevel;

/// Create the default logger and tracer pair.
pub fn create_default_stack(
    service_name: &str,
    level: LogLevel,
) -> (Arc<dyn Logger>, Arc<dyn Tracer>) {
    let logger = Arc::new(StructuredLogger::new(service_name).with_level(level));
    let tracer = Arc::new(TracingTracer::new(service_name));
    (logger, tracer)
}

/// Create a logger and tracer that record nothing.
pub fn create_noop_stack() -> (Arc<dyn Logger>, Arc<dyn Tracer>) {
    (Arc::new(NoopLogger), Arc::new(DefaultTracer::new()))
}
