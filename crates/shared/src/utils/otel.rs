use anyhow::{Context as _, Result};
use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use opentelemetry_otlp::{LogExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    Resource, logs::SdkLoggerProvider, propagation::TraceContextPropagator,
    trace::SdkTracerProvider,
};
use tokio::time::Instant;
use tracing::info;

/// OTLP exporters for one service.
pub struct Telemetry {
    service_name: String,
    endpoint: String,
}

impl Telemetry {
    pub fn new(service_name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            endpoint: endpoint.into(),
        }
    }

    fn resource(&self) -> Resource {
        Resource::builder()
            .with_service_name(self.service_name.clone())
            .build()
    }

    /// Installs the global tracer provider and W3C trace-context propagator.
    pub fn init_tracer(&self) -> Result<SdkTracerProvider> {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let exporter = SpanExporter::builder()
            .with_tonic()
            .with_endpoint(self.endpoint.clone())
            .build()
            .context("Failed to build OTLP span exporter")?;

        let provider = SdkTracerProvider::builder()
            .with_resource(self.resource())
            .with_batch_exporter(exporter)
            .build();

        global::set_tracer_provider(provider.clone());

        Ok(provider)
    }

    pub fn init_logger(&self) -> Result<SdkLoggerProvider> {
        let exporter = LogExporter::builder()
            .with_tonic()
            .with_endpoint(self.endpoint.clone())
            .build()
            .context("Failed to build OTLP log exporter")?;

        Ok(SdkLoggerProvider::builder()
            .with_resource(self.resource())
            .with_batch_exporter(exporter)
            .build())
    }
}

/// A started server span plus the instant it started.
pub struct TracingContext {
    pub cx: Context,
    pub start_time: Instant,
}

impl TracingContext {
    pub fn start(
        tracer_name: &'static str,
        operation_name: &str,
        attributes: Vec<KeyValue>,
    ) -> Self {
        let start_time = Instant::now();
        let tracer: BoxedTracer = global::tracer(tracer_name);
        let mut span = tracer
            .span_builder(operation_name.to_string())
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        info!("Starting operation: {operation_name}");

        span.add_event(
            "Operation started",
            vec![KeyValue::new("operation", operation_name.to_string())],
        );

        Self {
            cx: Context::current_with_span(span),
            start_time,
        }
    }

    /// Ends the span and returns the elapsed seconds.
    pub fn finish(&self, is_success: bool, message: &str) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let status = if is_success { "SUCCESS" } else { "ERROR" };

        let span = self.cx.span();
        span.add_event(
            "Operation completed",
            vec![
                KeyValue::new("status", status),
                KeyValue::new("duration_secs", elapsed.to_string()),
                KeyValue::new("message", message.to_string()),
            ],
        );
        span.end();

        elapsed
    }
}
