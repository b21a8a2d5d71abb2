//! Errors raised while wiring the process: resolving the working directory,
//! printing help. Service failures arrive wrapped as `Application`.

use thiserror::Error;

use crate::application::ApplicationError;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Process-level I/O outside any service, e.g. `current_dir` or stdout.
    /// Exits with IOERR.
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    /// `context` names the step, e.g. "resolve working directory".
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type InfraResult<T> = Result<T, InfraError>;
