pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::interfaces::cli::{execute, Cli};

pub fn run() {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    let result = tokio::runtime::Runtime::new()
        .map_err(domain::error::AppError::from)
        .and_then(|runtime| runtime.block_on(execute(cli)));

    if let Err(err) = result {
        error!(error = %err, "sensor-rca failed");
        eprintln!("error: {}", err);
        std::process::exit(err.exit_code());
    }
}
