//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::exitcode;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Canonicalize path (resolve symlinks, make absolute).
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Result of a delegated external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code of the child process
    pub code: i32,
    /// Captured stdout (empty for interactive runs)
    pub stdout: String,
    /// Captured stderr (empty for interactive runs)
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == exitcode::OK
    }
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command with arguments and capture its output.
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<CommandOutput>;

    /// Run a command attached to the terminal and return its exit code.
    fn run_interactive(&self, cmd: &str, args: &[&str]) -> io::Result<i32>;
}

/// Interactive input abstraction.
pub trait InputProvider: Send + Sync {
    /// Ask a question; an empty answer yields `default`.
    fn ask(&self, question: &str, default: &str) -> io::Result<String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<CommandOutput> {
        let output = std::process::Command::new(cmd).args(args).output()?;
        Ok(CommandOutput {
            code: output.status.code().unwrap_or(exitcode::FAILURE),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run_interactive(&self, cmd: &str, args: &[&str]) -> io::Result<i32> {
        // Killed by signal: no exit code
        let status = std::process::Command::new(cmd).args(args).status()?;
        Ok(status.code().unwrap_or(exitcode::FAILURE))
    }
}

/// Reads answers from stdin, one line per question.
#[derive(Debug, Default)]
pub struct StdinInputProvider;

impl InputProvider for StdinInputProvider {
    fn ask(&self, question: &str, default: &str) -> io::Result<String> {
        use std::io::{BufRead, Write};

        print!("{} [{}]: ", question.cyan(), default);
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let answer = line.trim();
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer.to_string())
        }
    }
}
