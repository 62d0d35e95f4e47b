//! qrc Command-Line Interface
//!
//! Builds quantum reservoir computing circuits and writes them as
//! OpenQASM 3 or JSON.
//!
//! ```text
//! qrc build --layers 2 --input 1 --hidden 1 --dt 0.1 --nu 0.5 -J 0.2
//! qrc build --config reservoir.yaml --features features.json -o bound.qasm
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::build::BuildArgs;
use commands::{build, version};

/// qrc - quantum reservoir computing circuit builder
#[derive(Parser)]
#[command(name = "qrc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a reservoir circuit
    ///
    /// Settings come from flags, then QRC_* environment variables, then the
    /// config file.
    Build(BuildArgs),

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => build::execute(&args),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
