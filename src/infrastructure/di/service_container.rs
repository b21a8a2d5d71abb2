//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::{MergeService, ModelfileService};
use crate::config::Settings;
use crate::infrastructure::traits::{
    CommandRunner, FileSystem, InputProvider, RealCommandRunner, RealFileSystem,
    StdinInputProvider,
};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// Interactive input abstraction
    pub input: Arc<dyn InputProvider>,

    /// Directory holding the `Modelfile` and merge output
    pub work_dir: PathBuf,
}

impl ServiceContainer {
    /// Create a new service container with real implementations,
    /// rooted at the current working directory.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let work_dir = std::env::current_dir()
            .map_err(|e| InfraError::io("resolve current directory", e))?;
        Ok(Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            Arc::new(StdinInputProvider),
            work_dir,
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        input: Arc<dyn InputProvider>,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
            cmd,
            input,
            work_dir,
        }
    }

    /// Service for `list`, `export` and `import`.
    pub fn modelfile_service(&self) -> ModelfileService {
        ModelfileService::new(
            self.fs.clone(),
            self.cmd.clone(),
            self.input.clone(),
            self.settings.clone(),
            self.work_dir.clone(),
        )
    }

    /// Service for `merge`.
    pub fn merge_service(&self) -> MergeService {
        MergeService::new(
            self.fs.clone(),
            self.cmd.clone(),
            self.input.clone(),
            self.settings.clone(),
            self.work_dir.clone(),
        )
    }
}
