mod cmd;
mod config;
mod error;
mod fs;
mod grub;
mod ui;
mod util;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::{Config, Overrides};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use ui::UX;

#[derive(Debug, Parser)]
#[command(
    name = "grubsmith",
    version,
    about = "Install GRUB onto a provisioned target device"
)]
struct Cli {
    /// Config file (TOML or YAML); defaults to /etc/grubsmith.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Suppress operator output (logs still go to stderr)
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Debug-level logging unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Install GRUB to the device and write grub.cfg
    Install {
        #[command(flatten)]
        overrides: Overrides,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Run the full install inside a temporary tree without touching the host
    Simulate {
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Check installer, firmware, console and template readiness
    Doctor {
        #[command(flatten)]
        overrides: Overrides,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ui = UX::new(cli.quiet);
    let cfg = Config::load_or_default(cli.config.as_deref())?;

    match &cli.command {
        Command::Install { overrides, yes } => cmd::install::run_install(&ui, &cfg, overrides, *yes),
        Command::Simulate { overrides } => cmd::simulate::run_simulate(&ui, &cfg, overrides),
        Command::Doctor { overrides } => cmd::doctor::run_doctor(&ui, &cfg, overrides),
    }
}
