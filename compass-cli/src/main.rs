//! Compass CLI - heading display over simulated or replayed sensors.

mod commands;
mod device;
mod error;
mod runner;
mod tui_app;
mod ui;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::replay::ReplayArgs;
use commands::run::RunArgs;
use device::DEFAULT_SWEEP_RATE;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "compass", version, about = "Compass heading display")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show a live compass driven by simulated sensors
    Run {
        /// Simulated rotation speed in degrees per second
        #[arg(long, default_value_t = DEFAULT_SWEEP_RATE)]
        sweep_rate: f32,

        /// Simulate positioning switched off
        #[arg(long)]
        no_position: bool,

        /// Simulate a device without an orientation sensor
        #[arg(long)]
        no_sensor: bool,

        /// Print heading changes instead of the dashboard
        #[arg(long)]
        headless: bool,
    },

    /// Feed recorded samples (azimuth[,pitch,roll] per line) through the filter
    Replay {
        /// Sample file
        file: PathBuf,

        /// Also print dropped samples
        #[arg(short, long)]
        verbose: bool,
    },

    /// View or edit configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Run {
            sweep_rate,
            no_position,
            no_sensor,
            headless,
        } => commands::run::run(RunArgs {
            sweep_rate,
            no_position,
            no_sensor,
            headless,
        }),
        Commands::Replay { file, verbose } => commands::replay::run(ReplayArgs { file, verbose }),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
