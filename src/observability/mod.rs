//! OpenTelemetry-based observability with file-based span export.
//!
//! ```text
//! tracing → tracing-opentelemetry → OpenTelemetry SDK → JsonlSpanExporter → galleria-spans.jsonl
//! ```
//!
//! - **File-Based Export**: one JSON object per finished span in
//!   `<data_dir>/galleria-spans.jsonl`
//! - **Rotation**: at 5 MiB, keeping 3 numbered backups
//! - **Correlation**: [`current_trace_id`] is attached to each outgoing
//!   request's context so responses can be matched to spans
//!
//! Trace level comes from the `trace_level` plugin option, default `"info"`.

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{current_trace_id, init_tracing};
