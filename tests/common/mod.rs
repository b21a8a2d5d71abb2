//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use modelctl::config::Settings;
use modelctl::infrastructure::traits::{
    CommandOutput, CommandRunner, InputProvider, RealFileSystem,
};
use modelctl::infrastructure::ServiceContainer;

/// One recorded external call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub interactive: bool,
}

/// Mock command runner that records calls and replays canned results.
///
/// Unscripted calls succeed with empty output.
#[derive(Default)]
pub struct MockRunner {
    calls: Mutex<Vec<Call>>,
    outputs: Mutex<VecDeque<CommandOutput>>,
    fail_spawn: bool,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a missing executable.
    pub fn not_installed() -> Self {
        Self {
            fail_spawn: true,
            ..Self::default()
        }
    }

    pub fn respond(self, code: i32, stdout: &str, stderr: &str) -> Self {
        self.outputs.lock().unwrap().push_back(CommandOutput {
            code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, cmd: &str, args: &[&str], interactive: bool) -> io::Result<CommandOutput> {
        self.calls.lock().unwrap().push(Call {
            program: cmd.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            interactive,
        });
        if self.fail_spawn {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        }
        Ok(self
            .outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<CommandOutput> {
        self.record(cmd, args, false)
    }

    fn run_interactive(&self, cmd: &str, args: &[&str]) -> io::Result<i32> {
        self.record(cmd, args, true).map(|o| o.code)
    }
}

/// Input provider answering from a fixed list; `None` means "accept default".
pub struct CannedInput {
    answers: Mutex<VecDeque<Option<String>>>,
    questions: Mutex<Vec<String>>,
}

impl CannedInput {
    pub fn new(answers: &[Option<&str>]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.map(str::to_string)).collect()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn defaults() -> Self {
        Self::new(&[])
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl InputProvider for CannedInput {
    fn ask(&self, question: &str, default: &str) -> io::Result<String> {
        self.questions.lock().unwrap().push(question.to_string());
        let answer = self.answers.lock().unwrap().pop_front().flatten();
        Ok(answer.unwrap_or_else(|| default.to_string()))
    }
}

/// Settings rooted in a temp data directory.
pub fn test_settings(data_dir: &Path, user: Option<&str>) -> Settings {
    Settings {
        user: user.map(str::to_string),
        data_dir: data_dir.to_path_buf(),
        bin_dir: None,
        ollama_bin: "ollama".to_string(),
    }
}

/// Container with real filesystem and the given doubles.
pub fn container(
    settings: Settings,
    runner: Arc<MockRunner>,
    input: Arc<CannedInput>,
    work_dir: PathBuf,
) -> ServiceContainer {
    ServiceContainer::with_deps(settings, Arc::new(RealFileSystem), runner, input, work_dir)
}

pub const LIST_OUTPUT: &str = "\
NAME                ID              SIZE      MODIFIED
mistral:latest      61e88e884507    4.1 GB    3 days ago
all-minilm:latest   1b226e2802db    45 MB     5 weeks ago
llama3:70b          786f3184aec0    39 GB     2 months ago
codellama:7b        8fdf8f752f6e    3.8 GB    2 months ago
";

pub const MODELFILE: &str = "\
# Modelfile generated by \"ollama show\"
# To build a new Modelfile based on this, replace FROM with:
# FROM mistral:latest

FROM /usr/share/ollama/.ollama/models/blobs/sha256-ff82381e2bea
TEMPLATE \"\"\"[INST] {{ .Prompt }} [/INST]\"\"\"
PARAMETER stop [INST]
PARAMETER stop [/INST]
";
