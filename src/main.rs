use std::sync::Arc;
use std::{env, process};

use aclboot::cli::output;
use aclboot::cli::{BootstrapCommand, CliError, ConsoleUi};
use aclboot::config::Settings;
use aclboot::infrastructure::di::ServiceContainer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

fn main() {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            let e = CliError::Config(e);
            output::error(&e);
            process::exit(e.exit_code());
        }
    };

    setup_logging(&settings.log_level);

    let container = ServiceContainer::new(settings);
    let command = BootstrapCommand::new(&container, Arc::new(ConsoleUi));

    let args: Vec<String> = env::args().skip(1).collect();
    process::exit(command.run(&args));
}

fn setup_logging(default_level: &str) {
    // RUST_LOG wins over the configured level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    tracing::debug!("logging initialized: default_level={}", default_level);
}
