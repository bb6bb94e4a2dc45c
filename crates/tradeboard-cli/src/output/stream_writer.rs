use std::io::Write;

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamEventType {
    Start,
    Chunk,
    End,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamEventError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
}

impl StreamEventError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            view: None,
        }
    }

    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamEvent {
    pub event: StreamEventType,
    pub seq: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub ts: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StreamEventError>,
}

/// Writes one JSON event per line and flushes after each.
pub struct NdjsonStreamWriter<W: Write> {
    writer: W,
    next_seq: u64,
}

impl<W: Write> NdjsonStreamWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            next_seq: 1,
        }
    }

    pub fn emit_start(&mut self, data: Option<Value>) -> Result<(), CliError> {
        self.emit(StreamEventType::Start, data, None)
    }

    pub fn emit_chunk(&mut self, data: Option<Value>) -> Result<(), CliError> {
        self.emit(StreamEventType::Chunk, data, None)
    }

    pub fn emit_end(&mut self, data: Option<Value>) -> Result<(), CliError> {
        self.emit(StreamEventType::End, data, None)
    }

    pub fn emit_error(
        &mut self,
        error: StreamEventError,
        data: Option<Value>,
    ) -> Result<(), CliError> {
        self.emit(StreamEventType::Error, data, Some(error))
    }

    fn emit(
        &mut self,
        event: StreamEventType,
        data: Option<Value>,
        error: Option<StreamEventError>,
    ) -> Result<(), CliError> {
        let event = StreamEvent {
            event,
            seq: self.next_seq,
            ts: OffsetDateTime::now_utc(),
            data,
            error,
        };
        self.next_seq += 1;

        let payload = serde_json::to_string(&event)?;
        self.writer.write_all(payload.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
