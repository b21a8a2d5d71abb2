use modelctl::cli::commands::{parse_args, report, run};
use modelctl::cli::{output, CliError};
use modelctl::config::Settings;
use modelctl::infrastructure::ServiceContainer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

fn main() {
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => std::process::exit(report(&e)),
    };
    if cli.no_color {
        output::disable_colors();
    }

    setup_logging(cli.debug);

    let container = match Settings::load()
        .map_err(CliError::from)
        .and_then(|settings| ServiceContainer::new(settings).map_err(CliError::from))
    {
        Ok(container) => container,
        Err(e) => std::process::exit(report(&e)),
    };

    std::process::exit(run(&cli, &container));
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG wins over -d
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();

    match level {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
