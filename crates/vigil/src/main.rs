// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vigil - relays filtered Discord channel messages to Pushover.
//!
//! This is the binary entry point for the monitor.

mod serve;

use clap::{Parser, Subcommand};

use vigil_config::VigilConfig;

/// Vigil - relay filtered Discord channel messages to Pushover.
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the monitor session and control API.
    Serve,
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup; configuration errors are
    // fatal before the session starts.
    let config = match vigil_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            vigil_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Config) => print_config(&config),
        Some(Commands::Serve) | None => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("vigil: {e}");
                std::process::exit(1);
            }
        }
    }
}

/// Prints the effective configuration as TOML, credentials redacted.
fn print_config(config: &VigilConfig) {
    match toml::to_string_pretty(&redact_config(config)) {
        Ok(rendered) => print!("{rendered}"),
        Err(e) => eprintln!("vigil: failed to render config: {e}"),
    }
}

fn redact_config(config: &VigilConfig) -> VigilConfig {
    let mut redacted = config.clone();
    if redacted.gateway.token.is_some() {
        redacted.gateway.token = Some("[redacted]".into());
    }
    if redacted.pushover.user_key.is_some() {
        redacted.pushover.user_key = Some("[redacted]".into());
    }
    if redacted.pushover.api_token.is_some() {
        redacted.pushover.api_token = Some("[redacted]".into());
    }
    redacted
}
