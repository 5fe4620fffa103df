//! Per-call spans for the Vertex AI client.

use std::time::Instant;

/// Tracer trait for creating spans.
pub trait Tracer: Send + Sync {
    /// Start a new span with the given name, e.g. `vertexai.content.stream`.
    fn start_span(&self, name: &str) -> Box<dyn Span>;
}

/// A traced operation. Spans are owned by the call they describe and ended
/// exactly once when the call reaches its outcome.
pub trait Span: Send {
    /// Set an attribute on the span.
    fn set_attribute(&mut self, key: &str, value: &str);

    /// Set the span status.
    fn set_status(&mut self, status: SpanStatus);

    /// Record a point-in-time event.
    fn add_event(&mut self, name: &str);

    /// End the span and record its duration.
    fn end(self: Box<Self>);
}

/// Status of a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanStatus {
    /// Operation completed successfully.
    Ok,
    /// Operation failed with an error message.
    Error(String),
}

/// Tracer that reports spans as `tracing` events.
pub struct TracingTracer {
    service_name: String,
}

impl TracingTracer {
    /// Create a new tracing tracer.
    pub fn new(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
        }
    }
}

impl Tracer for TracingTracer {
    fn start_span(&self, name: &str) -> Box<dyn Span> {
        tracing::trace!(
            service = %self.service_name,
            span_name = %name,
            "Span started"
        );

        Box::new(TracingSpan {
            name: name.to_string(),
            service_name: self.service_name.clone(),
            start: Instant::now(),
            attributes: Vec::new(),
            events: 0,
            status: None,
        })
    }
}

/// Span implementation using the tracing crate.
pub struct TracingSpan {
    name: String,
    service_name: String,
    start: Instant,
    attributes: Vec<(String, String)>,
    events: usize,
    status: Option<SpanStatus>,
}

impl TracingSpan {
    /// Current value of an attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Span for TracingSpan {
    fn set_attribute(&mut self, key: &str, value: &str) {
        self.attributes.push((key.to_string(), value.to_string()));
    }

    fn set_status(&mut self, status: SpanStatus) {
        self.status = Some(status);
    }

    fn add_event(&mut self, name: &str) {
        self.events += 1;
        tracing::trace!(span_name = %self.name, event_name = %name, "Span event");
    }

    fn end(self: Box<Self>) {
        let duration_ms = self.start.elapsed().as_millis() as u64;
        let (status, error) = match &self.status {
            Some(SpanStatus::Ok) => ("ok", None),
            Some(SpanStatus::Error(message)) => ("error", Some(message.as_str())),
            None => ("unset", None),
        };

        tracing::debug!(
            service = %self.service_name,
            span_name = %self.name,
            duration_ms,
            status,
            error = ?error,
            attributes = ?self.attributes,
            event_count = self.events,
            "Span ended"
        );
    }
}

/// Tracer that produces no-op spans.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTracer;

impl DefaultTracer {
    /// Creates a new no-op tracer.
    pub fn new() -> Self {
        Self
    }
}

impl Tracer for DefaultTracer {
    fn start_span(&self, _name: &str) -> Box<dyn Span> {
        Box::new(NoOpSpan)
    }
}

struct NoOpSpan;

impl Span for NoOpSpan {
    fn set_attribute(&mut self, _key: &str, _value: &str) {}
    fn set_status(&mut self, _status: SpanStatus) {}
    fn add_event(&mut self, _name: &str) {}
    fn end(self: Box<Self>) {}
}
