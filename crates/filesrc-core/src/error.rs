use std::error::Error as StdError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid path pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl Error {
    /// Render the error together with every underlying cause, outermost first.
    pub fn report(&self) -> String {
        let mut report = self.to_string();
        // Display already embeds the direct source of every wrapping variant
        let mut source = self.source().and_then(|cause| cause.source());
        while let Some(cause) = source {
            report.push_str("\n  caused by: ");
            report.push_str(&cause.to_string());
            source = cause.source();
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_includes_causes() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::Generic(anyhow::Error::new(io).context("listing bucket"));

        assert_eq!(
            err.report(),
            "Generic error: listing bucket\n  caused by: access denied"
        );
    }

    #[test]
    fn report_does_not_repeat_wrapped_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such bucket");
        assert_eq!(Error::Io(io).report(), "IO error: no such bucket");
    }

    #[test]
    fn report_without_cause_is_display() {
        let err = Error::Connection("unreachable".to_string());
        assert_eq!(err.report(), "Connection error: unreachable");
    }
}
