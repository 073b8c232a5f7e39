use tracing::{Level, Span};

use super::TraceId;

/// Create a root span for one decision request.
pub fn root_span(algorithm: &'static str, trace_id: &TraceId) -> Span {
    tracing::span!(
        Level::INFO,
        "decision",
        algorithm = algorithm,
        trace_id = %trace_id.value()
    )
}

/// Create a child span for a sub-step (inherits trace_id automatically).
pub fn child_span(name: &'static str) -> Span {
    tracing::span!(Level::INFO, "step", name = name)
}
