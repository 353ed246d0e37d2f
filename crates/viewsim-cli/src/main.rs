mod commands;
mod host;
mod store;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "viewsim", about = "Responsive and device viewport simulator")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in device presets
    Devices(commands::devices::DevicesArgs),
    /// Compute the frame layout for a mode, device and panel size
    Layout(commands::layout::LayoutArgs),
    /// Show how address bar input is turned into an address
    Normalize(commands::normalize::NormalizeArgs),
    /// Replay a timed event script through a view session
    Replay(commands::replay::ReplayArgs),
    /// Inspect the view state saved in a store file
    State(commands::state::StateArgs),
    /// Print or save the default view config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Layout(args) => commands::layout::run(args),
        Commands::Normalize(args) => commands::normalize::run(args),
        Commands::Replay(args) => commands::replay::run(args),
        Commands::State(args) => commands::state::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
