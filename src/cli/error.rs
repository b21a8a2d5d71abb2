//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Args(#[from] clap::Error),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// A failed external command propagates its own exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Args(e) if !e.use_stderr() => exitcode::OK,
            CliError::Args(_) => exitcode::USAGE,
            CliError::Infra(InfraError::Io { .. }) => exitcode::IOERR,
            CliError::Infra(InfraError::Application(e)) => match e {
                ApplicationError::CommandFailed { code, .. } => *code,
                ApplicationError::OperationFailed { .. } => exitcode::IOERR,
                ApplicationError::Domain(_)
                | ApplicationError::Config { .. }
                | ApplicationError::MissingSetting { .. }
                | ApplicationError::FileNotFound { .. }
                | ApplicationError::InvalidModelfile { .. }
                | ApplicationError::ProgramNotFound { .. }
                | ApplicationError::UnsupportedPlatform { .. } => exitcode::FAILURE,
            },
        }
    }

    /// Remediation hints, if any.
    pub fn hints(&self) -> &[String] {
        match self {
            CliError::Infra(InfraError::Application(e)) => e.hints(),
            _ => &[],
        }
    }

    /// Stderr captured from a failed external command.
    pub fn command_stderr(&self) -> Option<&str> {
        match self {
            CliError::Infra(InfraError::Application(ApplicationError::CommandFailed {
                stderr,
                ..
            })) if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }
}
