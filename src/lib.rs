//! modelctl: manage local Ollama Modelfiles and merge GGUF shards.
//!
//! All model storage and GGUF handling is delegated to external tools
//! (`ollama`, `llama-gguf-split`); this crate parses arguments, checks
//! configuration and preconditions, and edits the local `Modelfile`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
