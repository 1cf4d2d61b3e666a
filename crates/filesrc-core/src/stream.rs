use crate::{Result, SourceConfig};
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Serialize;
use serde_json::{Map, Value};

/// A single record read from a file
pub type Record = Map<String, Value>;

/// Capabilities of a stream implementation.
///
/// Answered by the factory without building a stream, so it must not depend on
/// any configuration or perform I/O.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamCapabilities {
    pub supports_incremental: bool,
}

/// Trait for file based streams
#[async_trait]
pub trait FileStream: Send + Sync {
    /// Name of the stream, i.e. the configured dataset
    fn name(&self) -> &str;

    /// Configuration this stream was built from
    fn config(&self) -> &SourceConfig;

    /// Whether this stream can read incrementally from a start date
    fn supports_incremental(&self) -> bool;

    /// Lazily list file identifiers available to this stream.
    /// Each call starts a fresh listing.
    fn filepath_iterator(&self) -> BoxStream<'_, Result<String>>;

    /// Read every record of one file
    async fn read_records(&self, filepath: &str) -> Result<Vec<Record>>;
}

/// Factory trait for creating file streams
pub trait FileStreamFactory: Send + Sync {
    /// Get the provider identifier for this stream implementation
    fn name(&self) -> &str;

    /// Static capabilities of the streams this factory creates
    fn capabilities(&self) -> StreamCapabilities;

    /// Create a new stream instance from configuration
    fn create(&self, config: &SourceConfig) -> Result<Box<dyn FileStream>>;
}
