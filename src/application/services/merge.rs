//! GGUF merge via `llama-gguf-split`, plus installation of the pinned tool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::{Settings, BIN_DIR_ENV_VAR, LLAMA_CPP_VERSION, MERGE_TOOL};
use crate::infrastructure::traits::{CommandRunner, FileSystem, InputProvider};

/// Output file written to the working directory.
pub const MERGED_FILE_NAME: &str = "merged-model.gguf";

const RELEASE_BASE_URL: &str = "https://github.com/ggml-org/llama.cpp/releases/download";

/// Result of `merge --download`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Tool installed; path of the merge binary
    Installed(PathBuf),
    /// User declined the confirmation prompt
    Declined,
}

/// Prebuilt llama.cpp release archive for an OS/arch pair.
pub fn release_asset(os: &str, arch: &str) -> Option<String> {
    let platform = match (os, arch) {
        ("linux", "x86_64") => "ubuntu-x64",
        ("macos", "aarch64") => "macos-arm64",
        ("macos", "x86_64") => "macos-x64",
        _ => return None,
    };
    Some(format!("llama-{LLAMA_CPP_VERSION}-bin-{platform}.zip"))
}

/// Download URL of a release archive.
pub fn release_url(asset: &str) -> String {
    format!("{RELEASE_BASE_URL}/{LLAMA_CPP_VERSION}/{asset}")
}

/// Service behind `merge`.
pub struct MergeService {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    input: Arc<dyn InputProvider>,
    settings: Arc<Settings>,
    work_dir: PathBuf,
}

impl MergeService {
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

    /// Merge two GGUF files into `./merged-model.gguf`.
    ///
    /// Both inputs and the merge tool must exist before anything runs.
    /// `llama-gguf-split` locates the remaining shards from the first one.
    #[instrument(skip(self))]
    pub fn merge(&self, first: &Path, second: &Path) -> ApplicationResult<PathBuf> {
        for file in [first, second] {
            let resolved = self.work_dir.join(file);
            if !self.fs.is_file(&resolved) {
                return Err(ApplicationError::FileNotFound {
                    path: file.to_path_buf(),
                    hints: vec![],
                });
            }
        }
        if first.parent() != second.parent() {
            warn!("shards are in different directories; llama-gguf-split looks next to the first");
        }

        let tool = self.settings.merge_tool();
        if !self.fs.is_file(&tool) {
            return Err(ApplicationError::ProgramNotFound {
                program: tool.display().to_string(),
                hints: vec![
                    "run `modelctl merge --download` to install it".to_string(),
                    format!("or set {BIN_DIR_ENV_VAR} to a directory containing {MERGE_TOOL}"),
                ],
            });
        }

        let output = self.work_dir.join(MERGED_FILE_NAME);
        let tool_str = tool.to_string_lossy().into_owned();
        let first_str = self.work_dir.join(first).to_string_lossy().into_owned();
        let output_str = output.to_string_lossy().into_owned();
        debug!("merging {} with {}", first_str, tool_str);

        let code = self
            .cmd
            .run_interactive(
                tool_str.as_str(),
                &["--merge", first_str.as_str(), output_str.as_str()],
            )
            .with_program_context(MERGE_TOOL)?;
        if code != 0 {
            return Err(ApplicationError::CommandFailed {
                program: MERGE_TOOL.to_string(),
                code,
                stderr: String::new(),
            });
        }

        info!("merged into {}", output.display());
        Ok(output)
    }

    /// Download and unpack the pinned llama.cpp release after confirmation.
    #[instrument(skip(self))]
    pub fn download(&self) -> ApplicationResult<DownloadOutcome> {
        let os = std::env::consts::OS;
        let arch = std::env::consts::ARCH;
        let asset = release_asset(os, arch).ok_or_else(|| ApplicationError::UnsupportedPlatform {
            program: MERGE_TOOL.to_string(),
            platform: format!("{os}-{arch}"),
        })?;
        self.install(&asset)
    }

    /// Install a specific release archive into the data directory.
    pub fn install(&self, asset: &str) -> ApplicationResult<DownloadOutcome> {
        let install_dir = self.settings.install_dir();
        let question = format!(
            "Download llama.cpp {LLAMA_CPP_VERSION} into {}? (y/N)",
            install_dir.display()
        );
        let answer = self
            .input
            .ask(&question, "n")
            .map_err(|e| ApplicationError::OperationFailed {
                context: "read answer from stdin".to_string(),
                source: Box::new(e),
            })?;
        if !is_yes(&answer) {
            debug!("download declined");
            return Ok(DownloadOutcome::Declined);
        }

        self.fs
            .create_dir_all(&install_dir)
            .with_path_context("create directory", &install_dir)?;

        let url = release_url(asset);
        let archive = install_dir.join(asset);
        let archive_str = archive.to_string_lossy().into_owned();
        let install_str = install_dir.to_string_lossy().into_owned();

        info!("downloading {}", url);
        let unpacked = self
            .delegate("curl", &["-fL", "-o", archive_str.as_str(), url.as_str()])
            .and_then(|()| {
                self.delegate(
                    "unzip",
                    &["-o", "-q", archive_str.as_str(), "-d", install_str.as_str()],
                )
            });
        // The archive goes whether or not unpacking succeeded
        let cleaned = if self.fs.is_file(&archive) {
            self.fs
                .remove_file(&archive)
                .with_path_context("remove archive", &archive)
        } else {
            Ok(())
        };
        if unpacked.is_err() {
            warn!("install of {} incomplete; rerun `merge --download`", asset);
        }
        unpacked?;
        cleaned?;

        let tool = install_dir.join("build").join("bin").join(MERGE_TOOL);
        if !self.fs.is_file(&tool) {
            return Err(ApplicationError::FileNotFound {
                path: tool,
                hints: vec![format!("the layout of {asset} may have changed")],
            });
        }
        Ok(DownloadOutcome::Installed(tool))
    }

    fn delegate(&self, program: &str, args: &[&str]) -> ApplicationResult<()> {
        let code = self
            .cmd
            .run_interactive(program, args)
            .with_program_context(program)?;
        if code != 0 {
            return Err(ApplicationError::CommandFailed {
                program: program.to_string(),
                code,
                stderr: String::new(),
            });
        }
        Ok(())
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("linux", "x86_64", Some("ubuntu-x64"))]
    #[case("macos", "aarch64", Some("macos-arm64"))]
    #[case("macos", "x86_64", Some("macos-x64"))]
    #[case("freebsd", "x86_64", None)]
    fn given_platform_when_release_asset_then_maps_to_archive(
        #[case] os: &str,
        #[case] arch: &str,
        #[case] platform: Option<&str>,
    ) {
        let expected = platform.map(|p| format!("llama-{LLAMA_CPP_VERSION}-bin-{p}.zip"));
        assert_eq!(release_asset(os, arch), expected);
    }

    #[test]
    fn given_asset_when_release_url_then_points_at_pinned_tag() {
        let url = release_url("a.zip");
        assert_eq!(
            url,
            format!("https://github.com/ggml-org/llama.cpp/releases/download/{LLAMA_CPP_VERSION}/a.zip")
        );
    }

    #[rstest]
    #[case("y", true)]
    #[case(" YES ", true)]
    #[case("n", false)]
    #[case("", false)]
    #[case("yep", false)]
    fn given_answer_when_is_yes_then_only_y_or_yes(#[case] answer: &str, #[case] expected: bool) {
        assert_eq!(is_yes(answer), expected);
    }
}
