// Strand workflow runner
// Main entry point for the strand binary

use clap::Parser;
use std::process::ExitCode;
use strand_engine::cli::{Cli, Command, ConfigAction};
use strand_engine::config::Config;
use strand_engine::handlers::{
    handle_chat, handle_config_path, handle_config_show, handle_run, handle_steps, handle_tools,
    OutputFormat,
};
use strand_engine::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // --log beats the config file; RUST_LOG beats both
    let log_level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry(log_level, cli.json);

    tracing::debug!("Strand v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Run { query, meta } => {
            // Failures are already printed with their hint
            if !handle_run(query, &meta, &config, format).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Chat => handle_chat(&config, format).await?,
        Command::Steps => handle_steps(&config, format)?,
        Command::Tools => handle_tools(&config, format)?,
        Command::Config { action } => match action {
            ConfigAction::Show => handle_config_show(&config, format)?,
            ConfigAction::Path => handle_config_path(format)?,
        },
    }

    Ok(ExitCode::SUCCESS)
}
