use crate::LocalStreamFactory;
use filesrc_core::FileSource;
use serde_json::{json, Value};
use std::sync::Arc;

pub const DOCUMENTATION_URL: &str = "https://docs.example.com/integrations/sources/local-files";

/// JSON schema of the configuration accepted by the local source
pub fn connection_specification() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "Local Files Source Spec",
        "type": "object",
        "required": ["dataset", "path_pattern", "provider"],
        "properties": {
            "dataset": {
                "title": "Dataset",
                "description": "Name of the stream that will be output by this source.",
                "type": "string",
                "pattern": "^([A-Za-z0-9-_]+)$"
            },
            "path_pattern": {
                "title": "Path Pattern",
                "description": "Glob pattern(s) selecting the files to replicate, relative to the root. Use ** to match across directories and | to separate several patterns.",
                "type": "string",
                "examples": ["**", "exports/*.jsonl|archive/**/*.jsonl"]
            },
            "format": {
                "title": "File Format",
                "type": "string",
                "enum": ["jsonl", "json"],
                "default": "jsonl"
            },
            "provider": {
                "title": "Local Directory",
                "type": "object",
                "required": ["root"],
                "properties": {
                    "root": {
                        "title": "Root",
                        "description": "Directory the path pattern is evaluated against.",
                        "type": "string"
                    }
                }
            },
            "start_date": {
                "title": "Start Date",
                "description": "Only files modified at or after this date are read. RFC 3339.",
                "type": "string",
                "format": "date-time",
                "examples": ["2021-01-01T00:00:00Z"]
            }
        }
    })
}

/// The local files source, ready to register
pub fn local_source() -> FileSource {
    FileSource::new(
        Arc::new(LocalStreamFactory),
        connection_specification(),
        DOCUMENTATION_URL,
    )
}
