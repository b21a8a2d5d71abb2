//! Error conversion helpers for common I/O operations
//!
//! Provides extension traits for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.write(&modelfile, &content)
    ///     .with_path_context("write Modelfile", &modelfile)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;

    /// Map a failure to spawn `program` to a typed error.
    ///
    /// A missing executable becomes [`ApplicationError::ProgramNotFound`].
    fn with_program_context(self, program: &str) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }

    fn with_program_context(self, program: &str) -> ApplicationResult<T> {
        self.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ApplicationError::ProgramNotFound {
                    program: program.to_string(),
                    hints: vec![format!("make sure '{program}' is installed and on your PATH")],
                }
            } else {
                ApplicationError::OperationFailed {
                    context: format!("run {program}"),
                    source: Box::new(e),
                }
            }
        })
    }
}
