//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of Modelfile / listing rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("no line starting with '{marker}' found")]
    MarkerNotFound { marker: &'static str },

    #[error("expected exactly one line starting with '{marker}', found {count}")]
    MultipleMarkers { marker: &'static str, count: usize },

    #[error("invalid checkpoint \"{checkpoint}\": must be a single non-empty line")]
    InvalidCheckpoint { checkpoint: String },
}
