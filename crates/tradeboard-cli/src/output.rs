pub mod stream_writer;

use std::io::{self, Write};

use serde_json::{json, Value};
use tradeboard_core::Envelope;

use self::stream_writer::{NdjsonStreamWriter, StreamEventError};
use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Ndjson => {
            let payload = serde_json::to_string(envelope)?;
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => render_table(&mut out, envelope)?,
    }

    Ok(())
}

/// Stream the envelope as events: one chunk per dashboard panel, or a single
/// chunk for any other command.
pub fn render_stream<W: Write>(writer: W, envelope: &Envelope<Value>) -> Result<(), CliError> {
    let mut writer = NdjsonStreamWriter::new(writer);

    writer.emit_start(Some(json!({
        "request_id": envelope.meta.request_id,
        "schema_version": envelope.meta.schema_version,
        "dataset": envelope.meta.dataset,
    })))?;

    match envelope.data.get("panels").and_then(Value::as_object) {
        Some(panels) => {
            for (panel, data) in panels {
                if data.is_null() {
                    continue;
                }
                writer.emit_chunk(Some(json!({ "panel": panel, "data": data })))?;
            }
        }
        None => writer.emit_chunk(Some(envelope.data.clone()))?,
    }

    for error in &envelope.errors {
        let mut stream_error = StreamEventError::new(error.code.clone(), error.message.clone());
        if let Some(view) = &error.view {
            stream_error = stream_error.with_view(view.clone());
        }
        writer.emit_error(stream_error, None)?;
    }

    writer.emit_end(Some(json!({
        "status": if envelope.errors.is_empty() { "ok" } else { "error" },
        "warning_count": envelope.meta.warnings.len(),
        "error_count": envelope.errors.len(),
        "latency_ms": envelope.meta.latency_ms,
    })))?;

    Ok(())
}

fn render_table<W: Write>(out: &mut W, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(out, "schema      : {}", envelope.meta.schema_version)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(out, "dataset     : {}", envelope.meta.dataset)?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;
    writeln!(out, "cache_hit   : {}", envelope.meta.cache_hit)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    writeln!(out, "data:")?;
    let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
    for line in pretty_data.lines() {
        writeln!(out, "  {line}")?;
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            match &error.view {
                Some(view) => writeln!(out, "  - [{view}] {}: {}", error.code, error.message)?,
                None => writeln!(out, "  - {}: {}", error.code, error.message)?,
            }
        }
    }

    Ok(())
}
