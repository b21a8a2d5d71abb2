//! Command dispatch: parse argv, route to services, report outcome.

use std::ffi::OsString;
use std::path::Path;

use clap::{ColorChoice, Command, CommandFactory, FromArgMatches};
use tracing::{debug, instrument};

use crate::application::services::DownloadOutcome;
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::BIN_DIR_ENV_VAR;
use crate::exitcode;
use crate::infrastructure::{InfraError, ServiceContainer};

/// Parse process arguments. Flags are accepted anywhere on the line.
///
/// `--no-color` is honored before parsing so usage errors and help are plain too.
pub fn parse_args<I, T>(args: I) -> CliResult<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let mut cmd = build_command(wants_no_color(&args));
    let matches = cmd.try_get_matches_from_mut(args)?;
    Ok(Cli::from_arg_matches(&matches).map_err(|e| e.format(&mut cmd))?)
}

/// The clap command, with styling switched off for `--no-color`.
pub fn build_command(no_color: bool) -> Command {
    let cmd = Cli::command();
    if no_color {
        cmd.color(ColorChoice::Never)
    } else {
        cmd
    }
}

/// Scan raw argv (up to `--`) for the no-color flag in any of its spellings.
pub fn wants_no_color(args: &[OsString]) -> bool {
    args.iter()
        .skip(1)
        .filter_map(|a| a.to_str())
        .take_while(|a| *a != "--")
        .any(|a| match a {
            "--no-color" | "--nc" => true,
            short if short.starts_with('-') && !short.starts_with("--") => {
                // clustered short flags, e.g. `-dn`
                short[1..].chars().all(|c| matches!(c, 'd' | 'n')) && short.contains('n')
            }
            _ => false,
        })
}

/// Parse and execute in one step; returns the process exit code.
pub fn dispatch<I, T>(args: I, container: &ServiceContainer) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match parse_args(args) {
        Ok(cli) => {
            if cli.no_color {
                output::disable_colors();
            }
            run(&cli, container)
        }
        Err(e) => report(&e),
    }
}

/// Execute a parsed invocation and report errors; returns the exit code.
pub fn run(cli: &Cli, container: &ServiceContainer) -> i32 {
    match execute_command(cli, container) {
        Ok(()) => exitcode::OK,
        Err(e) => report(&e),
    }
}

/// Print an error (with captured tool stderr and hints) and return its exit code.
pub fn report(err: &CliError) -> i32 {
    match err {
        CliError::Args(e) => {
            // clap renders help/version to stdout and usage errors to stderr
            let _ = e.print();
        }
        _ => {
            if let Some(stderr) = err.command_stderr() {
                output::raw_err(stderr);
            }
            output::error(err);
            for hint in err.hints() {
                output::hint(hint);
            }
        }
    }
    err.exit_code()
}

pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::List { name, size }) => cmd_list(container, *name, *size),
        Some(Commands::Export { checkpoint }) => cmd_export(container, checkpoint),
        Some(Commands::Import { checkpoint }) => cmd_import(container, checkpoint),
        Some(Commands::Merge {
            download: true, ..
        }) => cmd_download(container),
        Some(Commands::Merge {
            file1: Some(file1),
            file2: Some(file2),
            ..
        }) => cmd_merge(container, file1, file2),
        // clap enforces both files unless --download
        Some(Commands::Merge { .. }) | None => cmd_help(cli.no_color),
    }
}

fn cmd_help(no_color: bool) -> CliResult<()> {
    build_command(no_color)
        .print_help()
        .map_err(|e| InfraError::io("print help", e))?;
    Ok(())
}

#[instrument(skip(container))]
fn cmd_list(container: &ServiceContainer, name: bool, size: bool) -> CliResult<()> {
    let sort = Commands::sort_key(name, size);
    debug!("sort: {:?}", sort);
    let listing = container.modelfile_service().list(sort)?;
    output::raw(&listing);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_export(container: &ServiceContainer, checkpoint: &str) -> CliResult<()> {
    let path = container.modelfile_service().export(checkpoint)?;
    output::success(&format!("Exported {} to {}", checkpoint, path.display()));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_import(container: &ServiceContainer, checkpoint: &str) -> CliResult<()> {
    let model = container.modelfile_service().import(checkpoint)?;
    output::success(&format!("Created {}", model));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_merge(container: &ServiceContainer, file1: &Path, file2: &Path) -> CliResult<()> {
    let merged = container.merge_service().merge(file1, file2)?;
    output::success(&format!("Merged into {}", merged.display()));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_download(container: &ServiceContainer) -> CliResult<()> {
    match container.merge_service().download()? {
        DownloadOutcome::Installed(tool) => {
            output::success(&format!("Installed {}", tool.display()));
            let configured = container.settings.merge_tool();
            if configured != tool {
                output::warning(&format!(
                    "{} is set; merge will use {}",
                    BIN_DIR_ENV_VAR,
                    configured.display()
                ));
            }
        }
        DownloadOutcome::Declined => output::detail("Download cancelled"),
    }
    Ok(())
}
