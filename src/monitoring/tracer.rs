/*!
 * Structured Tracing
 * Structured tracing for simulation runs using the tracing crate
 *
 * Features:
 * - Trace ID generation to correlate the events of one run
 * - JSON-formatted logs for structured parsing
 * - Operation spans that log their duration on drop
 */

use crate::core::limits::SLOW_OPERATION_MS;
use std::time::Instant;
use tracing::{debug, info, span, warn, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - OSVIZ_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("OSVIZ_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        info!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_names(true)
                    .compact(),
            )
            .init();
        info!("Structured tracing initialized");
    }
}

/// Generate a unique trace ID for run correlation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span for operation tracing with structured fields
pub struct OperationSpan {
    span: Span,
    start: Instant,
    trace_id: String,
}

impl OperationSpan {
    pub fn new(operation: &'static str) -> Self {
        let trace_id = generate_trace_id();

        let span = span!(
            Level::DEBUG,
            "operation",
            trace_id = %trace_id,
            operation = operation,
            duration_us = tracing::field::Empty,
            result = tracing::field::Empty,
            items_processed = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        let _entered = span.enter();
        debug!(operation = operation, trace_id = %trace_id, "operation started");
        drop(_entered);

        Self {
            span,
            start: Instant::now(),
            trace_id,
        }
    }

    /// Get the trace ID for this operation
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Record the operation result
    pub fn record_result(&self, success: bool) {
        self.span
            .record("result", if success { "success" } else { "error" });
    }

    /// Record an error
    pub fn record_error(&self, error: &str) {
        self.span.record("error", error);
        self.span.record("result", "error");
    }

    /// Record items processed count (ticks, steps, processes scanned)
    pub fn record_items_processed(&self, count: usize) {
        self.span.record("items_processed", count);
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for OperationSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_us", duration.as_micros() as u64);

        if duration.as_millis() > SLOW_OPERATION_MS {
            warn!(
                trace_id = %self.trace_id,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow operation detected"
            );
        } else {
            debug!(
                trace_id = %self.trace_id,
                duration_us = duration.as_micros() as u64,
                "operation completed"
            );
        }
    }
}

/// Helper to create an operation span
#[inline]
pub fn span_operation(name: &'static str) -> OperationSpan {
    OperationSpan::new(name)
}
