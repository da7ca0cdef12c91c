//! Tracing initialization and subscriber setup.

use super::tracer;
use crate::infrastructure::span_file;
use crate::Config;
use opentelemetry::trace::{TraceContextExt, TracerProvider as _};
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::{OpenTelemetryLayer, OpenTelemetrySpanExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "Galleria";

/// Installs the global subscriber: an `EnvFilter` at the configured
/// `trace_level` (default `info`) feeding an OpenTelemetry layer that writes
/// spans to `<data_dir>/galleria-spans.jsonl`.
///
/// Failures are silent; the plugin runs without traces. Only the first call
/// takes effect.
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.clone().unwrap_or_else(|| "info".to_string());

    if std::fs::create_dir_all(&config.data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SERVICE_NAME)]);
    let provider = tracer::create_tracer_provider(span_file(&config.data_dir), SERVICE_NAME, resource);

    let tracer = provider.tracer(SERVICE_NAME);
    let otel_layer = OpenTelemetryLayer::new(tracer);

    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter).with(otel_layer);

    let _ = subscriber.try_init();
}

/// Trace id of the current span, for correlating requests with exported spans.
///
/// `None` when tracing is not initialized or no span is active.
#[must_use]
pub fn current_trace_id() -> Option<String> {
    let context = tracing::Span::current().context();
    let span = context.span();
    let span_context = span.span_context();
    span_context
        .is_valid()
        .then(|| format!("{:032x}", span_context.trace_id()))
}
