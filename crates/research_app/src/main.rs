mod shell;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use research_logging::{redact, research_info};

use shell::config::AppConfig;
use shell::logging::{self, LogDestination};

#[derive(Parser)]
#[command(
    name = "research",
    about = "Search the web, summarize what was found, and quiz yourself on it"
)]
struct Cli {
    /// Optional RON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generative-text API key (falls back to GEMINI_API_KEY)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    log: LogDestination,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log);

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    let api_key = cli.api_key.unwrap_or_default();
    research_info!("starting research shell, api key {}", redact(&api_key));

    shell::app::run(config, api_key)
}
