use crate::{Error, FileSource, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of file sources keyed by provider name
pub struct Registry {
    sources: HashMap<String, Arc<FileSource>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// Register a source under its provider name, replacing any previous one
    pub fn register(&mut self, source: FileSource) {
        let name = source.name().to_string();
        self.sources.insert(name, Arc::new(source));
    }

    /// Get a source by name
    pub fn get(&self, name: &str) -> Result<Arc<FileSource>> {
        self.sources
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Configuration(format!("Source '{}' not found", name)))
    }

    /// List all registered source names, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sources.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryStreamFactory;
    use serde_json::json;

    #[test]
    fn register_and_lookup() {
        let mut registry = Registry::new();
        registry.register(FileSource::new(
            Arc::new(InMemoryStreamFactory::new()),
            json!({}),
            "https://docs.example.com",
        ));

        assert_eq!(registry.list(), vec!["in-memory".to_string()]);
        assert_eq!(registry.get("in-memory").unwrap().name(), "in-memory");
        assert!(matches!(
            registry.get("s3"),
            Err(Error::Configuration(_))
        ));
    }
}
