use crate::{ConnectionStatus, ConnectorSpecification, Record, Result};
use chrono::Utc;
use serde::Serialize;

/// Messages written to stdout, one JSON document per line
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    Spec {
        spec: ConnectorSpecification,
    },
    ConnectionStatus {
        #[serde(rename = "connectionStatus")]
        connection_status: ConnectionStatus,
    },
    Record {
        record: RecordMessage,
    },
    Log {
        log: LogMessage,
    },
}

impl Message {
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordMessage {
    pub stream: String,
    pub data: Record,
    /// Milliseconds since the unix epoch
    pub emitted_at: i64,
}

impl RecordMessage {
    pub fn new(stream: impl Into<String>, data: Record) -> Self {
        Self {
            stream: stream.into(),
            data,
            emitted_at: Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogMessage {
    pub level: LogLevel,
    pub message: String,
}
