//! Ollama model listing and Modelfile export/import.
//!
//! All model storage is owned by `ollama`; this service only shapes the
//! arguments, captures output and edits the local `Modelfile`.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::{Settings, USER_ENV_VAR};
use crate::domain::modelfile::{replace_from_line, validate_checkpoint, MODELFILE_NAME};
use crate::domain::{default_model_name, Listing, ModelRef, SortKey};
use crate::infrastructure::traits::{CommandRunner, FileSystem, InputProvider};

/// Default tag offered when importing.
pub const DEFAULT_TAG: &str = "latest";

/// Service behind `list`, `export` and `import`.
pub struct ModelfileService {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    input: Arc<dyn InputProvider>,
    settings: Arc<Settings>,
    work_dir: PathBuf,
}

impl ModelfileService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        input: Arc<dyn InputProvider>,
        settings: Arc<Settings>,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            fs,
            cmd,
            input,
            settings,
            work_dir,
        }
    }

    /// Location of the `Modelfile` in the working directory.
    pub fn modelfile_path(&self) -> PathBuf {
        self.work_dir.join(MODELFILE_NAME)
    }

    /// Run `ollama list`, optionally reordering the rows.
    ///
    /// Without a sort key the output is returned verbatim.
    #[instrument(skip(self))]
    pub fn list(&self, sort: Option<SortKey>) -> ApplicationResult<String> {
        let ollama = self.settings.ollama_bin.as_str();
        let output = self
            .cmd
            .run(ollama, &["list"])
            .with_program_context(ollama)?;

        if !output.success() {
            return Err(ApplicationError::CommandFailed {
                program: format!("{ollama} list"),
                code: output.code,
                stderr: output.stderr,
            });
        }

        match sort {
            None => Ok(output.stdout),
            Some(key) => {
                let mut listing = Listing::parse(&output.stdout);
                debug!("sorting {} rows by {}", listing.rows().len(), key);
                listing.sort_by(key);
                Ok(listing.render())
            }
        }
    }

    /// Write the Modelfile of `checkpoint` to `./Modelfile`.
    ///
    /// The file is only written when `ollama show` succeeds.
    #[instrument(skip(self))]
    pub fn export(&self, checkpoint: &str) -> ApplicationResult<PathBuf> {
        let ollama = self.settings.ollama_bin.as_str();
        let output = self
            .cmd
            .run(ollama, &["show", "--modelfile", checkpoint])
            .with_program_context(ollama)?;

        if !output.success() {
            return Err(ApplicationError::CommandFailed {
                program: format!("{ollama} show"),
                code: output.code,
                stderr: output.stderr,
            });
        }

        let path = self.modelfile_path();
        self.fs
            .write(&path, &output.stdout)
            .with_path_context("write Modelfile", &path)?;
        info!("exported {} to {}", checkpoint, path.display());
        Ok(path)
    }

    /// Configured user identity, or a remediation error.
    pub fn require_user(&self) -> ApplicationResult<String> {
        self.settings
            .user()
            .map(str::to_string)
            .ok_or_else(|| ApplicationError::MissingSetting {
                setting: USER_ENV_VAR,
                hints: vec![
                    format!("export {USER_ENV_VAR}=<your ollama.com username>"),
                    "or set `user = \"...\"` in the modelctl.toml config file".to_string(),
                ],
            })
    }

    /// Point `./Modelfile` at `checkpoint` and create the model with ollama.
    ///
    /// Fails before touching any file when no user identity is configured
    /// or the checkpoint spans more than one line.
    #[instrument(skip(self))]
    pub fn import(&self, checkpoint: &str) -> ApplicationResult<ModelRef> {
        let user = self.require_user()?;
        validate_checkpoint(checkpoint)?;

        let path = self.modelfile_path();
        if !self.fs.is_file(&path) {
            return Err(ApplicationError::FileNotFound {
                path,
                hints: vec!["run `modelctl export <checkpoint>` first".to_string()],
            });
        }
        // Absolute path survives the prompt/ollama boundary unambiguously
        let path = self
            .fs
            .canonicalize(&path)
            .with_path_context("resolve Modelfile", &path)?;

        let content = self
            .fs
            .read_to_string(&path)
            .with_path_context("read Modelfile", &path)?;
        let updated = replace_from_line(&content, checkpoint).map_err(|source| {
            ApplicationError::InvalidModelfile {
                path: path.clone(),
                source,
            }
        })?;
        self.fs
            .write(&path, &updated)
            .with_path_context("write Modelfile", &path)?;
        debug!("rewrote FROM line in {}", path.display());

        let name = self
            .input
            .ask("Model name", &default_model_name(checkpoint))
            .map_err(prompt_err)?;
        let tag = self.input.ask("Tag", DEFAULT_TAG).map_err(prompt_err)?;
        let model = ModelRef {
            user,
            name: non_blank_or(name, || default_model_name(checkpoint)),
            tag: non_blank_or(tag, || DEFAULT_TAG.to_string()),
        };

        let ollama = self.settings.ollama_bin.as_str();
        let target = model.to_string();
        let modelfile = path.to_string_lossy().into_owned();
        let code = self
            .cmd
            .run_interactive(ollama, &["create", target.as_str(), "-f", modelfile.as_str()])
            .with_program_context(ollama)?;
        if code != 0 {
            return Err(ApplicationError::CommandFailed {
                program: format!("{ollama} create"),
                code,
                stderr: String::new(),
            });
        }

        info!("created {}", model);
        Ok(model)
    }
}

fn prompt_err(e: std::io::Error) -> ApplicationError {
    ApplicationError::OperationFailed {
        context: "read answer from stdin".to_string(),
        source: Box::new(e),
    }
}

fn non_blank_or(value: String, default: impl FnOnce() -> String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default()
    } else {
        trimmed.to_string()
    }
}
