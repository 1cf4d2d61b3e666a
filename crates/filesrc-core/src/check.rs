use crate::Error;
use serde::{Deserialize, Serialize};

/// Outcome of a connection check
#[derive(Debug)]
pub enum ConnectionCheckResult {
    Succeeded,
    Failed(Error),
}

impl ConnectionCheckResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// The error that made the check fail, if any
    pub fn diagnostic(&self) -> Option<&Error> {
        match self {
            Self::Succeeded => None,
            Self::Failed(e) => Some(e),
        }
    }

    pub fn to_status(&self) -> ConnectionStatus {
        match self {
            Self::Succeeded => ConnectionStatus {
                status: Status::Succeeded,
                message: None,
            },
            Self::Failed(e) => ConnectionStatus {
                status: Status::Failed,
                message: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Succeeded,
    Failed,
}

/// Serializable form of a connection check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub status: Status,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
