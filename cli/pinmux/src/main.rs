//! pinmux CLI: compiles microcontroller pin tables into HAL headers.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use manifest::PinmuxManifest;

#[derive(Parser)]
#[command(name = "pinmux", version, about = "Pin mapping compiler for microcontroller HALs")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new pinmux project
    Init {
        /// Project name
        name: String,
    },
    /// Compile pin tables and write the generated headers and sources
    Build {
        /// Table files (default: the tables listed in pinmux.toml)
        tables: Vec<PathBuf>,
        /// Write artifacts under this directory instead of beside each table
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Compile a pin table and print the resolved model
    Inspect {
        /// Table file
        table: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = Export::Text)]
        export: Export,
        /// Part of the model to show
        #[arg(long, value_enum, default_value_t = View::All)]
        view: View,
    },
    /// Remove generated artifacts
    Clean {
        /// Table files (default: the tables listed in pinmux.toml)
        tables: Vec<PathBuf>,
        /// Directory the artifacts were written under
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Export {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    Pins,
    Functions,
    Clocks,
    All,
}

fn main() {
    let cli = Cli::parse();
    let result = init_logging(cli.verbose, cli.quiet).and_then(|()| run(cli));
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

fn init_logging(verbose: u8, quiet: bool) -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(log_level(verbose, quiet))
        .init()
        .context("installing logger")
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name } => commands::init::run(&name),
        Commands::Build { tables, out_dir } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::build::run(&project_dir, manifest.as_ref(), &tables, out_dir.as_deref())
        }
        Commands::Inspect {
            table,
            export,
            view,
        } => {
            let (manifest, _) = load_manifest_optional(&cwd)?;
            commands::inspect::run(&table, manifest.as_ref(), export, view)
        }
        Commands::Clean { tables, out_dir } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::clean::run(&project_dir, manifest.as_ref(), &tables, out_dir.as_deref())
        }
    }
}

/// Load `pinmux.toml` if present, returning `(manifest, project_dir)`.
fn load_manifest_optional(
    cwd: &Path,
) -> anyhow::Result<(Option<PinmuxManifest>, Option<PathBuf>)> {
    match PinmuxManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
