use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::application::{DiagnosticPipeline, RunMode};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMProvider;
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::llm_clients::RouterClient;

#[derive(Debug, Parser)]
#[command(
    name = "sensor-rca",
    version,
    about = "Diagnose low pH readings from sensor CSV exports and write an HTML report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the CSV exports, decide the root cause and print the HTML report
    Run(RunArgs),
    /// Store a provider API key in the OS keyring (read from stdin)
    SetKey {
        #[arg(long)]
        provider: LLMProvider,
    },
    /// Remove a provider API key from the OS keyring
    DeleteKey {
        #[arg(long)]
        provider: LLMProvider,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Direct,
    Tools,
    Offline,
}

impl From<ModeArg> for RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Direct => RunMode::Direct,
            ModeArg::Tools => RunMode::Tools,
            ModeArg::Offline => RunMode::Offline,
        }
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// How the report is produced
    #[arg(long, value_enum, default_value_t = ModeArg::Direct)]
    pub mode: ModeArg,

    /// Directory holding the three CSV files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// TOML configuration file (default: sensor-rca.toml if present)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub async fn execute(cli: Cli) -> Result<()> {
    let config_service = ConfigService::new();

    match cli.command {
        Command::Run(args) => run_report(&config_service, args).await,
        Command::SetKey { provider } => {
            eprint!("API key for {}: ", provider.key_name());
            io::stderr().flush()?;
            let mut key = String::new();
            io::stdin().lock().read_line(&mut key)?;
            config_service.save_api_key(provider, &key)?;
            info!(provider = provider.key_name(), "API key stored in keyring");
            Ok(())
        }
        Command::DeleteKey { provider } => {
            config_service.delete_api_key(provider)?;
            info!(provider = provider.key_name(), "API key removed from keyring");
            Ok(())
        }
    }
}

async fn run_report(config_service: &ConfigService, args: RunArgs) -> Result<()> {
    let mut config = config_service.load(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config.data.dir = dir;
    }

    let mode = RunMode::from(args.mode);
    if mode != RunMode::Offline {
        config_service.resolve_api_key(&mut config.llm)?;
    }

    let pipeline = DiagnosticPipeline::new(config, Arc::new(RouterClient::new()));
    let report = pipeline.run(mode).await?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, report.as_str()).map_err(|e| {
                AppError::IoError(format!("Failed to write {}: {}", path.display(), e))
            })?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{}", report.as_str()),
    }
    Ok(())
}
