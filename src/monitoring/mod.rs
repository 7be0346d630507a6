/*!
 * Monitoring
 * Structured logging setup and operation spans
 */

pub mod tracer;

pub use tracer::{init_tracing, OperationSpan, TraceFormat};
