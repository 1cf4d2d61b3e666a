use crate::{
    Error, FileStream, FileStreamFactory, Record, Result, SourceConfig, StreamCapabilities,
};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::{json, Value};

/// Credentials for the hiring platform sandbox
pub fn test_config() -> SourceConfig {
    SourceConfig::new()
        .with("client_id", "test_client_id")
        .with("client_secret", "test_client_secret")
        .with("refresh_token", "test_refresh_token")
        .with("environment", "Sandbox")
        .with("start_date", "2021-05-07T00:00:00Z")
}

pub fn test_full_refresh_config() -> SourceConfig {
    SourceConfig::new().with("base_url", "test_base_url")
}

pub fn test_incremental_config() -> SourceConfig {
    SourceConfig::new()
        .with("base_url", "test_base_url")
        .with("start_date", "2020-01-01T00:00:00Z")
}

/// A single opportunity as returned by the hiring platform API
pub fn test_opportunity_record() -> Value {
    json!({
        "id": "test_id",
        "name": "test_name",
        "contact": "test_contact",
        "headline": "test_headline",
        "stage": "test_stage",
        "confidentiality": "non-confidential",
        "location": "test_location",
        "phones": [{"type": "test_mobile", "value": "test_value"}],
        "emails": ["test_emails"],
        "links": ["test_link_1", "test_link_2"],
        "archived": {"reason": "test_reason", "archivedAt": 1628513942512i64},
        "tags": [],
        "sources": ["test_source_1"],
        "stageChanges": [{
            "toStageId": "test_lead-new",
            "toStageIndex": 0,
            "updatedAt": 1628509001183i64,
            "userId": "test_userId"
        }],
        "origin": "test_origin",
        "sourcedBy": "test_sourcedBy",
        "owner": "test_owner",
        "followers": ["test_follower"],
        "applications": ["test_application"],
        "createdAt": 1738509001183i64,
        "updatedAt": 1738542849132i64,
        "lastInteractionAt": 1738513942512i64,
        "lastAdvancedAt": 1738513942512i64,
        "snoozedUntil": null,
        "urls": {
            "list": "https://hire.sandbox.lever.co/candidates",
            "show": "https://hire.sandbox.lever.co/candidates/test_show"
        },
        "isAnonymized": false,
        "dataProtection": null
    })
}

/// In-memory stream implementation for testing
#[derive(Debug, Clone, Default)]
pub struct InMemoryStreamFactory {
    files: Vec<(String, Vec<Record>)>,
    listing_error: Option<String>,
    create_error: Option<String>,
    incremental: bool,
}

impl InMemoryStreamFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files
            .extend(paths.into_iter().map(|path| (path.into(), Vec::new())));
        self
    }

    /// Add a file holding the given records. Non-object values are ignored.
    pub fn with_file(mut self, path: impl Into<String>, records: Vec<Value>) -> Self {
        let records = records
            .iter()
            .filter_map(|value| value.as_object().cloned())
            .collect();
        self.files.push((path.into(), records));
        self
    }

    /// Make listing fail on its first element
    pub fn with_listing_error(mut self, message: impl Into<String>) -> Self {
        self.listing_error = Some(message.into());
        self
    }

    /// Make stream construction fail
    pub fn with_create_error(mut self, message: impl Into<String>) -> Self {
        self.create_error = Some(message.into());
        self
    }

    pub fn incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }
}

impl FileStreamFactory for InMemoryStreamFactory {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn capabilities(&self) -> StreamCapabilities {
        StreamCapabilities {
            supports_incremental: self.incremental,
        }
    }

    fn create(&self, config: &SourceConfig) -> Result<Box<dyn FileStream>> {
        if let Some(message) = &self.create_error {
            return Err(Error::Configuration(message.clone()));
        }

        Ok(Box::new(InMemoryStream {
            name: config.dataset().unwrap_or_default().to_string(),
            config: config.clone(),
            factory: self.clone(),
        }))
    }
}

pub struct InMemoryStream {
    name: String,
    config: SourceConfig,
    factory: InMemoryStreamFactory,
}

#[async_trait]
impl FileStream for InMemoryStream {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn supports_incremental(&self) -> bool {
        self.factory.incremental
    }

    fn filepath_iterator(&self) -> BoxStream<'_, Result<String>> {
        if let Some(message) = &self.factory.listing_error {
            return stream::iter(vec![Err(Error::Connection(message.clone()))]).boxed();
        }

        stream::iter(self.factory.files.iter().map(|(path, _)| Ok(path.clone()))).boxed()
    }

    async fn read_records(&self, filepath: &str) -> Result<Vec<Record>> {
        self.factory
            .files
            .iter()
            .find(|(path, _)| path == filepath)
            .map(|(_, records)| records.clone())
            .ok_or_else(|| Error::Connection(format!("No such file: {}", filepath)))
    }
}
