/*!
 * Tracing
 * Subscriber setup and timed operation spans using the tracing crate
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, span, warn, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
    EnvFilter,
};

/// Operations slower than this are logged at warn level
const SLOW_OPERATION: Duration = Duration::from_millis(50);

static NEXT_TRACE_ID: AtomicU64 = AtomicU64::new(1);

/// Output format for [`init_tracing`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceFormat {
    /// Human-readable single-line output
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// Install a global subscriber
///
/// Honors `RUST_LOG` (default: info). Returns an error instead of panicking
/// when a global subscriber is already installed, so tests and embedding
/// applications can call it freely.
pub fn init_tracing(format: TraceFormat) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        TraceFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
        TraceFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init(),
    }
}

/// Timed span around one filesystem operation
///
/// Logs the elapsed time when dropped.
pub struct OperationSpan {
    span: Span,
    start: Instant,
    operation: &'static str,
    trace_id: u64,
}

impl OperationSpan {
    pub fn new(operation: &'static str, subject: &str) -> Self {
        let trace_id = NEXT_TRACE_ID.fetch_add(1, Ordering::Relaxed);
        let span = span!(
            Level::DEBUG,
            "vfs_operation",
            trace_id,
            operation,
            subject,
            duration_us = tracing::field::Empty,
            result = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            operation,
            trace_id,
        }
    }

    pub fn trace_id(&self) -> u64 {
        self.trace_id
    }

    pub fn record_result(&self, success: bool) {
        self.span.record("result", if success { "success" } else { "error" });
    }

    pub fn record_error(&self, error: &str) {
        self.span.record("error", error);
        self.span.record("result", "error");
    }

    /// Record the outcome of `result` and pass it through
    pub fn finish<T, E: std::fmt::Display>(self, result: Result<T, E>) -> Result<T, E> {
        match &result {
            Ok(_) => self.record_result(true),
            Err(e) => self.record_error(&e.to_string()),
        }
        result
    }
}

impl Drop for OperationSpan {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_us", elapsed.as_micros() as u64);

        if elapsed > SLOW_OPERATION {
            warn!(
                trace_id = self.trace_id,
                operation = self.operation,
                duration_ms = elapsed.as_millis() as u64,
                slow = true,
                "Slow filesystem operation"
            );
        } else {
            debug!(
                trace_id = self.trace_id,
                operation = self.operation,
                duration_us = elapsed.as_micros() as u64,
                "Operation completed"
            );
        }
    }
}
