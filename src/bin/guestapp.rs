//! guestapp — load and inspect the guest application's configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use guestapp_config::config::{self, Config};
use guestapp_config::telemetry::{TelemetryConfig, init_telemetry};

#[derive(Parser)]
#[command(name = "guestapp", about = "Guest application configuration")]
struct Cli {
    /// Dotenv file to read before the process environment
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the configuration and exit
    Check,
    /// Print the configuration with secrets redacted
    Show {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env = match cli.env_file {
        Some(ref path) => config::env_with_file(path)?,
        None => {
            dotenvy::dotenv().ok();
            config::process_env()?
        }
    };

    init_telemetry(TelemetryConfig::load(&env)?)?;
    let config = Config::load(&env)?;

    match cli.command {
        Command::Check => cmd_check(&config),
        Command::Show { json } => cmd_show(&config, json),
    }
}

fn cmd_check(config: &Config) -> anyhow::Result<()> {
    println!("configuration OK ({})", config.environment());
    Ok(())
}

fn cmd_show(config: &Config, json: bool) -> anyhow::Result<()> {
    let summary = config.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }
    Ok(())
}
