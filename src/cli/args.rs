//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::SortKey;

/// Manage local Ollama Modelfiles and merge GGUF shards
#[derive(Parser, Debug)]
#[command(name = "modelctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable colored output
    #[arg(short = 'n', long = "no-color", visible_alias = "nc", global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List local models (ollama list)
    List {
        /// Sort by model name
        #[arg(long, conflicts_with = "size")]
        name: bool,
        /// Sort by size, largest first
        #[arg(long)]
        size: bool,
    },

    /// Write the Modelfile of a model to ./Modelfile
    Export {
        /// Model to export
        checkpoint: String,
    },

    /// Point ./Modelfile at a checkpoint and create the model
    Import {
        /// Checkpoint for the FROM line (path or model reference)
        checkpoint: String,
    },

    /// Merge GGUF shards into ./merged-model.gguf (llama-gguf-split)
    Merge {
        /// First shard
        #[arg(required_unless_present = "download", value_hint = ValueHint::FilePath)]
        file1: Option<PathBuf>,
        /// Second shard
        #[arg(required_unless_present = "download", value_hint = ValueHint::FilePath)]
        file2: Option<PathBuf>,
        /// Download and install llama-gguf-split instead of merging
        #[arg(long, conflicts_with_all = ["file1", "file2"])]
        download: bool,
    },
}

impl Commands {
    /// Sort key selected by `list --name` / `list --size`.
    pub fn sort_key(name: bool, size: bool) -> Option<SortKey> {
        match (name, size) {
            (true, _) => Some(SortKey::Name),
            (_, true) => Some(SortKey::Size),
            _ => None,
        }
    }
}
