mod check;
mod config;
mod error;
mod pattern;
mod protocol;
mod registry;
mod source;
mod spec;
mod stream;

pub use check::{ConnectionCheckResult, ConnectionStatus, Status};
pub use config::{SourceConfig, DATASET, FORMAT, PATH_PATTERN, PROVIDER, START_DATE};
pub use error::{Error, Result};
pub use pattern::{globmatch, PathPattern, ALTERNATION};
pub use protocol::{LogLevel, LogMessage, Message, RecordMessage};
pub use registry::Registry;
pub use source::FileSource;
pub use spec::{ConnectorSpecification, DestinationSyncMode};
pub use stream::{FileStream, FileStreamFactory, Record, StreamCapabilities};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
