//! Fabula CLI binary.
//!
//! This binary provides command-line access to every story stage:
//! - Plan and write stories with review passes
//! - Brainstorm elaborations, twists and branches
//! - Profile characters, describe settings and rewrite styles

use clap::Parser;
use fabula::{LoggingConfig, init_logging};
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    use cli::{Cli, run};

    // Load .env before anything reads the environment
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let logging = LoggingConfig::new(cli.verbose).with_format(cli.log_format);
    if let Err(e) = init_logging(&logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "Command failed");
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
