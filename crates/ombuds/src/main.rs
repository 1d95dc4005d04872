// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ombuds - an anonymous-reporting Telegram intake bot.
//!
//! This is the binary entry point for the Ombuds bot.

mod health;
mod serve;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

/// Ombuds - an anonymous-reporting Telegram intake bot.
#[derive(Parser, Debug)]
#[command(name = "ombuds", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Ombuds bot server.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match ombuds_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            ombuds_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("ombuds serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            // Secrets are not echoed back.
            let mut redacted = config;
            if redacted.telegram.bot_token.is_some() {
                redacted.telegram.bot_token = Some("<redacted>".into());
            }
            if redacted.telegram.admin_password.is_some() {
                redacted.telegram.admin_password = Some("<redacted>".into());
            }
            match toml::to_string_pretty(&redacted) {
                Ok(rendered) => println!("{rendered}"),
                Err(e) => {
                    eprintln!("failed to render config: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("ombuds: use --help for available commands");
        }
    }
}
