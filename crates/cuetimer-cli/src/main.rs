use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cuetimer_core::TomlConfigStore;
use tracing_subscriber::EnvFilter;

mod commands;
mod sink;

#[derive(Parser)]
#[command(name = "cuetimer", version, about = "Interval timer with a get-ready cue")]
struct Cli {
    /// Config file (defaults to ~/.config/cuetimer/config.toml)
    #[arg(long, global = true, env = "CUETIMER_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive countdown
    Run {
        #[command(flatten)]
        durations: commands::DurationOverrides,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print every event of a full run without waiting in real time
    Simulate {
        #[command(flatten)]
        durations: commands::DurationOverrides,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = match cli.config {
        Some(path) => Ok(TomlConfigStore::new(path)),
        None => TomlConfigStore::default_location(),
    };
    let result = match store {
        Ok(store) => match cli.command {
            Commands::Run { durations } => commands::run::run(store, durations).await,
            Commands::Config { action } => commands::config::run(store, action),
            Commands::Simulate { durations } => commands::simulate::run(store, durations),
        },
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
