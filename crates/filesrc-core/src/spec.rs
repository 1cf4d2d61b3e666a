use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How extracted records are written at the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationSyncMode {
    Overwrite,
    Append,
    AppendDedup,
}

impl DestinationSyncMode {
    /// Modes a source can offer. Appending needs incremental reads.
    pub fn supported(incremental: bool) -> Vec<Self> {
        let mut modes = vec![Self::Overwrite];
        if incremental {
            modes.extend([Self::Append, Self::AppendDedup]);
        }
        modes
    }
}

/// Declarative description of a connector's configuration and capabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSpecification {
    #[serde(rename = "documentationUrl")]
    pub documentation_url: String,

    #[serde(rename = "changelogUrl")]
    pub changelog_url: String,

    #[serde(rename = "supportsIncremental")]
    pub supports_incremental: bool,

    pub supported_destination_sync_modes: Vec<DestinationSyncMode>,

    /// JSON schema of the accepted configuration
    #[serde(rename = "connectionSpecification")]
    pub connection_specification: Value,
}
