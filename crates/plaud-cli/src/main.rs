//! Plaud CLI - Main entry point

use clap::Parser;
use plaud_cli::{Cli, Commands, RecordingCommand};
use plaud_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Verbose mode logs debug to stderr; otherwise only warnings and errors
    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };
    let defaults = LogConfig::builder()
        .level(level)
        .output(LogOutput::Console)
        .log_file_prefix("plaud-cli")
        .build();

    // Environment variables take precedence over the defaults above
    let log_config = defaults.clone().apply_env().unwrap_or(defaults);

    // The CLI works without logging, so init failures are ignored
    let _guard = init_logging(&log_config).ok();

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> plaud_cli::Result<()> {
    let config = cli.config()?;

    match &cli.command {
        Commands::Check => plaud_cli::commands::check::run(&config).await,

        Commands::Devices => plaud_cli::commands::devices::run(&config).await,

        Commands::Recordings { command } => match command {
            RecordingCommand::List {
                all,
                limit,
                include_trash,
                sort_by,
                ascending,
            } => {
                plaud_cli::commands::recordings::list(
                    &config,
                    *all,
                    *limit,
                    *include_trash,
                    *sort_by,
                    *ascending,
                )
                .await
            },
            RecordingCommand::Url { ids, format } => {
                plaud_cli::commands::recordings::url(&config, ids, *format, cli.continue_on_fail)
                    .await
            },
            RecordingCommand::Rename { id, new_filename } => {
                plaud_cli::commands::recordings::rename(&config, id, new_filename).await
            },
            RecordingCommand::Download {
                ids,
                format,
                output_dir,
            } => {
                plaud_cli::commands::recordings::download(
                    &config,
                    ids,
                    *format,
                    output_dir,
                    cli.continue_on_fail,
                )
                .await
            },
        },

        Commands::Poll(args) => plaud_cli::commands::poll::run(&config, args).await,
    }
}
