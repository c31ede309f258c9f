use anyhow::Result;
use clap::Parser;
use menu_screens::cli::Cli;
use tracing_appender::non_blocking::WorkerGuard;

/// Install the tracing subscriber; logs go to `--log-file` when given
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match &cli.log_file {
        Some(log_file) => {
            let log_dir = log_file
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            std::fs::create_dir_all(log_dir)?;
            let file_name = log_file
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Invalid log file path: {:?}", log_file))?;

            let file_appender = tracing_appender::rolling::never(log_dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(non_blocking)
                .with_ansi(false) // Disable ANSI colors in file
                .init();

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();

            Ok(None)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let guard = init_logging(&cli)?;

    let result = cli.execute();

    // Flush buffered log lines before exit
    drop(guard);

    result
}
