//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("missing configuration: {setting} is not set")]
    MissingSetting {
        setting: &'static str,
        hints: Vec<String>,
    },

    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf, hints: Vec<String> },

    #[error("invalid {}: {source}", .path.display())]
    InvalidModelfile {
        path: PathBuf,
        #[source]
        source: DomainError,
    },

    #[error("{program} not found")]
    ProgramNotFound { program: String, hints: Vec<String> },

    #[error("{program} exited with code {code}")]
    CommandFailed {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("no prebuilt {program} for platform {platform}")]
    UnsupportedPlatform { program: String, platform: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// Remediation hints shown below the error message.
    pub fn hints(&self) -> &[String] {
        match self {
            ApplicationError::MissingSetting { hints, .. }
            | ApplicationError::FileNotFound { hints, .. }
            | ApplicationError::ProgramNotFound { hints, .. } => hints,
            _ => &[],
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
