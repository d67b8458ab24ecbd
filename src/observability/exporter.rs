//! OpenTelemetry span exporter that appends one JSON object per finished span.
//!
//! Lines look like:
//!
//! ```json
//! {"service":"tokotrends","traceId":"…","spanId":"…","parentSpanId":"…",
//!  "name":"worker_message","startUnixNano":"…","durationMicros":1840,
//!  "status":"unset","attributes":{"operation":"search products"},"events":[…]}
//! ```
//!
//! Export is synchronous (the provider uses the simple span processor), so a
//! span is on disk by the time it closes.

use super::rotating_file::RotatingFile;
use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, Status, TraceError};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Map, Value as JsonValue};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Service name attached to every exported span.
pub const SERVICE_NAME: &str = "tokotrends";

pub struct JsonLinesExporter {
    file: RotatingFile,
    service: String,
    is_shutdown: bool,
}

impl JsonLinesExporter {
    #[must_use]
    pub fn new(file: RotatingFile) -> Self {
        Self {
            file,
            service: SERVICE_NAME.to_string(),
            is_shutdown: false,
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> std::io::Result<()> {
        batch
            .iter()
            .try_for_each(|span| self.file.write_line(&span_to_json(&self.service, span).to_string()))
    }
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.is_shutdown {
            Err(TraceError::from("span exporter is shut down"))
        } else {
            self.write_batch(&batch)
                .map_err(|e| TraceError::from(format!("cannot write {}: {e}", self.file.path().display())))
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown = true;
    }

    fn set_resource(&mut self, resource: &Resource) {
        if let Some(name) = resource.get(opentelemetry::Key::from_static_str("service.name")) {
            self.service = name.to_string();
        }
    }
}

impl std::fmt::Debug for JsonLinesExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesExporter")
            .field("file", &self.file)
            .field("service", &self.service)
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

/// Builds a tracer provider that exports every span to `path`.
#[must_use]
pub fn create_tracer_provider(path: PathBuf) -> TracerProvider {
    let resource = Resource::new(vec![KeyValue::new("service.name", SERVICE_NAME)]);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(JsonLinesExporter::new(RotatingFile::new(path)))
        .build()
}

fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos()
        .to_string()
}

fn span_to_json(service: &str, span: &SpanData) -> JsonValue {
    let duration = span
        .end_time
        .duration_since(span.start_time)
        .unwrap_or(Duration::ZERO);
    let parent = if span.parent_span_id == SpanId::INVALID {
        String::new()
    } else {
        format!("{:016x}", span.parent_span_id)
    };
    let status = match &span.status {
        Status::Unset => json!("unset"),
        Status::Ok => json!("ok"),
        Status::Error { description } => json!({ "error": description.to_string() }),
    };
    let events: Vec<JsonValue> = span
        .events
        .iter()
        .map(|event| {
            json!({
                "name": event.name.to_string(),
                "timeUnixNano": unix_nanos(event.timestamp),
                "attributes": attributes_to_json(&event.attributes),
            })
        })
        .collect();

    json!({
        "service": service,
        "traceId": format!("{:032x}", span.span_context.trace_id()),
        "spanId": format!("{:016x}", span.span_context.span_id()),
        "parentSpanId": parent,
        "name": span.name.to_string(),
        "startUnixNano": unix_nanos(span.start_time),
        "durationMicros": u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
        "status": status,
        "attributes": attributes_to_json(&span.attributes),
        "events": events,
    })
}

/// Flattens attributes into a JSON object keyed by attribute name.
fn attributes_to_json(attributes: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = attributes
        .iter()
        .map(|kv| {
            let value = match &kv.value {
                Value::Bool(b) => json!(b),
                Value::I64(i) => json!(i),
                Value::F64(f) => json!(f),
                Value::String(s) => json!(s.as_str()),
                Value::Array(_) => json!(kv.value.to_string()),
            };
            (kv.key.to_string(), value)
        })
        .collect();
    JsonValue::Object(map)
}
