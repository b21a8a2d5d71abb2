//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner, InputProvider)
//! but are themselves concrete structs, not traits.

mod merge;
mod modelfile;

pub use merge::{release_asset, release_url, DownloadOutcome, MergeService, MERGED_FILE_NAME};
pub use modelfile::{ModelfileService, DEFAULT_TAG};
