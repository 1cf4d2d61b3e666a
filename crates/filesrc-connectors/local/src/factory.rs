use crate::{LocalConfig, LocalStream};
use filesrc_core::{
    Error, FileStream, FileStreamFactory, Result, SourceConfig, StreamCapabilities,
};

pub struct LocalStreamFactory;

impl FileStreamFactory for LocalStreamFactory {
    fn name(&self) -> &str {
        "local"
    }

    fn capabilities(&self) -> StreamCapabilities {
        StreamCapabilities {
            supports_incremental: true,
        }
    }

    fn create(&self, config: &SourceConfig) -> Result<Box<dyn FileStream>> {
        let local: LocalConfig = serde_json::from_value(config.clone().into_value())?;
        if local.dataset.trim().is_empty() {
            return Err(Error::Configuration("dataset must not be empty".to_string()));
        }
        Ok(Box::new(LocalStream::new(local, config.clone())))
    }
}
