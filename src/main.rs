//! Wavecrop CLI
//!
//! Command-line interface for inspecting tracks and running scripted
//! crop-region sessions.

use clap::Parser;
use env_logger::Env;
use log::info;

use wavecrop::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Wavecrop v{}", env!("CARGO_PKG_VERSION"));

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Inspect { input }) => commands::inspect(&input, config),
        Some(Commands::Peaks { input, buckets }) => commands::peaks(&input, buckets, config),
        Some(Commands::Run { input, steps }) => commands::run(&input, &steps, config),
        None => {
            println!("Wavecrop v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}
