use crate::walk::list_files;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use filesrc_core::{Error, FileStream, Record, Result, SourceConfig};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

/// Column added to every record, holding the file it came from
pub const SOURCE_FILE_COLUMN: &str = "_ab_source_file";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Name of the stream
    pub dataset: String,

    /// Pattern(s) selecting the files of the stream, `|` separated
    pub path_pattern: String,

    #[serde(default)]
    pub format: FileFormat,

    pub provider: LocalProvider,

    /// Skip files last modified before this instant
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalProvider {
    /// Directory the path pattern is evaluated against
    pub root: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// One JSON object per line
    #[default]
    Jsonl,
    /// A JSON array of objects, or a single object
    Json,
}

impl FileFormat {
    pub fn parse(&self, content: &str) -> Result<Vec<Record>> {
        match self {
            FileFormat::Jsonl => content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| Ok(serde_json::from_str::<Record>(line)?))
                .collect(),
            FileFormat::Json => match serde_json::from_str::<Value>(content)? {
                Value::Object(record) => Ok(vec![record]),
                Value::Array(values) => values
                    .into_iter()
                    .map(|value| match value {
                        Value::Object(record) => Ok(record),
                        other => Err(Error::Configuration(format!(
                            "Expected a JSON object, got {}",
                            other
                        ))),
                    })
                    .collect(),
                other => Err(Error::Configuration(format!(
                    "Expected a JSON object or array, got {}",
                    other
                ))),
            },
        }
    }
}

/// Stream over the files of a local directory tree
pub struct LocalStream {
    config: LocalConfig,
    source_config: SourceConfig,
}

impl LocalStream {
    pub fn new(config: LocalConfig, source_config: SourceConfig) -> Self {
        Self {
            config,
            source_config,
        }
    }

    async fn modified_before_start(&self, path: &std::path::Path) -> Result<bool> {
        let Some(start_date) = self.config.start_date else {
            return Ok(false);
        };
        let modified: DateTime<Utc> = tokio::fs::metadata(path).await?.modified()?.into();
        Ok(modified < start_date)
    }
}

#[async_trait]
impl FileStream for LocalStream {
    fn name(&self) -> &str {
        &self.config.dataset
    }

    fn config(&self) -> &SourceConfig {
        &self.source_config
    }

    fn supports_incremental(&self) -> bool {
        true
    }

    fn filepath_iterator(&self) -> BoxStream<'_, Result<String>> {
        list_files(self.config.provider.root.clone())
    }

    async fn read_records(&self, filepath: &str) -> Result<Vec<Record>> {
        let path = self.config.provider.root.join(filepath);

        if self.modified_before_start(&path).await? {
            debug!(file = %filepath, "Skipping file modified before start_date");
            return Ok(Vec::new());
        }

        let content = tokio::fs::read_to_string(&path).await?;
        let mut records = self.config.format.parse(&content)?;
        for record in &mut records {
            record.insert(
                SOURCE_FILE_COLUMN.to_string(),
                Value::String(filepath.to_string()),
            );
        }
        Ok(records)
    }
}
