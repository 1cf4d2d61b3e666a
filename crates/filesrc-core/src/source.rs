use crate::{
    globmatch, ConnectionCheckResult, ConnectorSpecification, DestinationSyncMode, Error,
    FileStream, FileStreamFactory, PathPattern, RecordMessage, Result, SourceConfig,
    StreamCapabilities,
};
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// A file based source: one stream implementation, one configuration schema and
/// one documentation link bound together.
///
/// Every operation builds what it needs from the configuration it is given, so
/// a `FileSource` holds no per-sync state.
pub struct FileSource {
    stream_factory: Arc<dyn FileStreamFactory>,
    connection_specification: Value,
    documentation_url: String,
}

impl FileSource {
    pub fn new(
        stream_factory: Arc<dyn FileStreamFactory>,
        connection_specification: Value,
        documentation_url: impl Into<String>,
    ) -> Self {
        Self {
            stream_factory,
            connection_specification,
            documentation_url: documentation_url.into(),
        }
    }

    /// Provider identifier of the bound stream implementation
    pub fn name(&self) -> &str {
        self.stream_factory.name()
    }

    pub fn capabilities(&self) -> StreamCapabilities {
        self.stream_factory.capabilities()
    }

    /// Check that the credentials give access to the files and that the path
    /// pattern can be evaluated.
    ///
    /// Errors building the stream are returned as `Err`. Errors while listing
    /// files or evaluating the pattern produce a failed check instead.
    pub async fn check_connection(&self, config: &SourceConfig) -> Result<ConnectionCheckResult> {
        let stream = self.stream_factory.create(config)?;

        match probe_first_file(stream.as_ref(), config).await {
            Ok(found_a_file) => {
                if !found_a_file {
                    warn!(
                        source = self.name(),
                        "Found 0 files (but connection is valid)."
                    );
                }
                info!(source = self.name(), "Connection check succeeded");
                Ok(ConnectionCheckResult::Succeeded)
            }
            Err(e) => {
                error!(source = self.name(), error = %e.report(), "Connection check failed");
                Ok(ConnectionCheckResult::Failed(e))
            }
        }
    }

    /// Build the streams of this source. There is exactly one per source.
    // TODO: split `dataset` and `path_pattern` per stream to serve several tables from one source
    pub fn streams(&self, config: &SourceConfig) -> Result<Vec<Box<dyn FileStream>>> {
        Ok(vec![self.stream_factory.create(config)?])
    }

    /// Describe the accepted configuration and supported sync modes
    pub fn spec(&self) -> ConnectorSpecification {
        let incremental = self.capabilities().supports_incremental;

        ConnectorSpecification {
            documentation_url: self.documentation_url.clone(),
            changelog_url: self.documentation_url.clone(),
            supports_incremental: incremental,
            supported_destination_sync_modes: DestinationSyncMode::supported(incremental),
            connection_specification: self.connection_specification.clone(),
        }
    }

    /// Read the files matching the configured path pattern, handing each record
    /// to `emit` as soon as its file is read. Returns the number of records.
    pub async fn read<F>(&self, config: &SourceConfig, mut emit: F) -> Result<usize>
    where
        F: FnMut(RecordMessage) -> Result<()>,
    {
        let pattern = PathPattern::parse(required_path_pattern(config)?)?;
        let mut total = 0usize;

        for stream in self.streams(config)? {
            let mut filepaths = stream.filepath_iterator();
            let mut files_read = 0usize;
            let mut records_read = 0usize;

            while let Some(filepath) = filepaths.next().await {
                let filepath = filepath?;
                if !pattern.matches(&filepath) {
                    debug!(stream = stream.name(), file = %filepath, "Skipping unmatched file");
                    continue;
                }

                let records = stream.read_records(&filepath).await?;
                debug!(
                    stream = stream.name(),
                    file = %filepath,
                    records = records.len(),
                    "Read file"
                );
                for record in records {
                    emit(RecordMessage::new(stream.name(), record))?;
                    records_read += 1;
                }
                files_read += 1;
            }

            info!(
                stream = stream.name(),
                files = files_read,
                records = records_read,
                "Finished reading stream"
            );
            total += records_read;
        }

        Ok(total)
    }
}

/// Pull at most one file and make sure the pattern evaluates against it.
/// Returns whether a file was found.
async fn probe_first_file(stream: &dyn FileStream, config: &SourceConfig) -> Result<bool> {
    let mut filepaths = stream.filepath_iterator();

    let Some(filepath) = filepaths.next().await else {
        return Ok(false);
    };
    let filepath = filepath?;

    // only evaluation errors matter here, the match itself is irrelevant
    globmatch(&filepath, required_path_pattern(config)?)?;
    Ok(true)
}

fn required_path_pattern(config: &SourceConfig) -> Result<&str> {
    config
        .path_pattern()
        .ok_or_else(|| Error::Configuration("path_pattern is required".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        test_full_refresh_config, test_incremental_config, InMemoryStreamFactory,
    };
    use crate::PATH_PATTERN;
    use serde_json::json;
    use std::io;
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    /// Log output captured from a thread-local subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn install(&self) -> tracing::subscriber::DefaultGuard {
            let subscriber = tracing_subscriber::fmt()
                .with_writer(self.clone())
                .with_ansi(false)
                .with_max_level(tracing::Level::DEBUG)
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    const DOCS: &str = "https://docs.example.com/sources/in-memory";

    fn source(factory: InMemoryStreamFactory) -> FileSource {
        FileSource::new(Arc::new(factory), json!({"type": "object"}), DOCS)
    }

    fn config(pattern: &str) -> SourceConfig {
        SourceConfig::new()
            .with("dataset", "opportunities")
            .with(PATH_PATTERN, pattern)
    }

    #[tokio::test]
    async fn check_succeeds_when_a_file_matches() {
        let source = source(InMemoryStreamFactory::new().with_files(["2021/opportunities.jsonl"]));

        let result = source.check_connection(&config("**/*.jsonl")).await.unwrap();
        assert!(result.is_success());
        assert!(result.diagnostic().is_none());
    }

    #[tokio::test]
    async fn check_ignores_pattern_mismatch() {
        let source = source(InMemoryStreamFactory::new().with_files(["opportunities.csv"]));

        let result = source.check_connection(&config("**/*.jsonl")).await.unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn check_succeeds_with_zero_files() {
        let source = source(InMemoryStreamFactory::new());

        let result = source.check_connection(&config("**/*.jsonl")).await.unwrap();
        assert!(result.is_success());
        assert!(result.diagnostic().is_none());
    }

    #[tokio::test]
    async fn check_fails_when_listing_fails() {
        let source = source(InMemoryStreamFactory::new().with_listing_error("access denied"));

        let result = source.check_connection(&config("**/*.jsonl")).await.unwrap();
        assert!(!result.is_success());
        match result.diagnostic() {
            Some(Error::Connection(message)) => assert_eq!(message, "access denied"),
            other => panic!("unexpected diagnostic: {other:?}"),
        }
    }

    #[tokio::test]
    async fn check_warns_when_no_files_are_found() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();
        let source = source(InMemoryStreamFactory::new());

        source.check_connection(&config("**/*.jsonl")).await.unwrap();

        let output = logs.contents();
        assert!(output.contains("WARN"));
        assert!(output.contains("Found 0 files (but connection is valid)."));
    }

    #[tokio::test]
    async fn check_logs_the_failure_at_error_level() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();
        let source = source(InMemoryStreamFactory::new().with_listing_error("access denied"));

        source.check_connection(&config("**/*.jsonl")).await.unwrap();

        let output = logs.contents();
        assert!(output.contains("ERROR"));
        assert!(output.contains("Connection check failed"));
        assert!(output.contains("access denied"));
        assert!(!output.contains("Found 0 files"));
    }

    #[tokio::test]
    async fn check_fails_on_malformed_pattern() {
        let source = source(InMemoryStreamFactory::new().with_files(["a/b.jsonl"]));

        let result = source.check_connection(&config("a/[.jsonl")).await.unwrap();
        assert!(matches!(result.diagnostic(), Some(Error::Pattern { .. })));
    }

    #[tokio::test]
    async fn check_fails_without_pattern_once_a_file_is_found() {
        let source = source(InMemoryStreamFactory::new().with_files(["a.jsonl"]));
        let config = SourceConfig::new().with("dataset", "opportunities");

        let result = source.check_connection(&config).await.unwrap();
        assert!(matches!(result.diagnostic(), Some(Error::Configuration(_))));
    }

    #[tokio::test]
    async fn check_propagates_construction_errors() {
        let source = source(InMemoryStreamFactory::new().with_create_error("dataset is required"));

        let err = source.check_connection(&config("**")).await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn streams_builds_one_independent_stream_per_call() {
        let source = source(InMemoryStreamFactory::new());
        let config = config("**/*.jsonl");

        let first = source.streams(&config).unwrap();
        let second = source.streams(&config).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(first[0].config(), second[0].config());
        assert!(!std::ptr::eq(first[0].config(), second[0].config()));
        assert_eq!(first[0].name(), "opportunities");
    }

    #[test]
    fn spec_without_incremental_only_overwrites() {
        let source = source(InMemoryStreamFactory::new());
        let streams = source.streams(&test_full_refresh_config()).unwrap();
        assert!(!streams[0].supports_incremental());

        let spec = source.spec();
        assert!(!spec.supports_incremental);
        assert_eq!(
            spec.supported_destination_sync_modes,
            vec![DestinationSyncMode::Overwrite]
        );
    }

    #[test]
    fn spec_with_incremental_allows_append() {
        let source = source(InMemoryStreamFactory::new().incremental(true));
        let streams = source.streams(&test_incremental_config()).unwrap();
        assert!(streams[0].supports_incremental());

        let spec = source.spec();
        assert!(spec.supports_incremental);
        assert_eq!(
            spec.supported_destination_sync_modes,
            vec![
                DestinationSyncMode::Overwrite,
                DestinationSyncMode::Append,
                DestinationSyncMode::AppendDedup,
            ]
        );
    }

    #[test]
    fn spec_links_and_schema() {
        let spec = source(InMemoryStreamFactory::new()).spec();
        assert_eq!(spec.documentation_url, DOCS);
        assert_eq!(spec.changelog_url, DOCS);
        assert_eq!(spec.connection_specification, json!({"type": "object"}));
    }

    #[tokio::test]
    async fn read_emits_records_of_matching_files_only() {
        let factory = InMemoryStreamFactory::new()
            .with_file("a.jsonl", vec![json!({"id": 1}), json!({"id": 2})])
            .with_file("b.csv", vec![json!({"id": 3})]);
        let source = source(factory);

        let mut messages = Vec::new();
        let count = source
            .read(&config("*.jsonl"), |message| {
                messages.push(message);
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(count, 2);
        let ids: Vec<_> = messages.iter().map(|m| m.data["id"].clone()).collect();
        assert_eq!(ids, vec![json!(1), json!(2)]);
        assert!(messages.iter().all(|m| m.stream == "opportunities"));
    }

    #[tokio::test]
    async fn read_stops_when_emit_fails() {
        let factory = InMemoryStreamFactory::new()
            .with_file("a.jsonl", vec![json!({"id": 1}), json!({"id": 2})])
            .with_file("b.jsonl", vec![json!({"id": 3})]);
        let source = source(factory);

        let mut emitted = 0;
        let err = source
            .read(&config("*.jsonl"), |_| {
                emitted += 1;
                Err(Error::Connection("stdout closed".to_string()))
            })
            .await
            .unwrap_err();

        assert_eq!(emitted, 1);
        assert!(matches!(err, Error::Connection(_)));
    }

    #[tokio::test]
    async fn read_rejects_malformed_pattern_up_front() {
        let source = source(InMemoryStreamFactory::new().with_listing_error("never listed"));

        let err = source
            .read(&config("a/[.jsonl"), |_| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Pattern { .. }));
    }
}
