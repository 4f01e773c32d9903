// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! askai - AI generation backend with per-user history.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use std::path::PathBuf;

use askai_config::{AskaiConfig, ConfigError};
use clap::{Parser, Subcommand};

/// askai - AI generation backend with per-user history.
#[derive(Parser, Debug)]
#[command(name = "askai", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// Validate the configuration and print a summary.
    CheckConfig,
}

fn load(path: Option<&PathBuf>) -> Result<AskaiConfig, Vec<ConfigError>> {
    match path {
        Some(path) => askai_config::load_and_validate_path(path),
        None => askai_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            askai_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("askai: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => print_summary(&config),
        None => {
            println!("askai: use --help for available commands");
        }
    }
}

fn print_summary(config: &AskaiConfig) {
    let set = |value: &Option<String>| if value.is_some() { "set" } else { "missing" };
    println!("config ok");
    println!("  listen:          {}:{}", config.server.host, config.server.port);
    println!("  allowed origin:  {}", config.server.allowed_origin);
    println!("  client id:       {}", set(&config.identity.client_id));
    println!("  recaptcha:       {}", set(&config.bot_check.secret));
    println!("  database:        {}", config.storage.database_path);
    println!(
        "  bucket:          {} ({})",
        config.artifacts.bucket, config.artifacts.region
    );
    println!(
        "  aws credentials: {}",
        set(&config.artifacts.secret_access_key)
    );
    println!("  provider:        {}", config.provider.base_url);
}
