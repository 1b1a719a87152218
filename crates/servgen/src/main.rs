//! servgen - Entry Point
//!
//! Binary entry point of the wiring generator.
//!
//! | Mode | Command | Description |
//! |------|---------|-------------|
//! | **Generate** | `servgen -p ./service` | Write the wiring files |
//! | **Check** | `servgen --check` | Print the schedule, write nothing |

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use servgen::infrastructure::logging::init_logging;
use servgen::{RunOptions, RunOutcome, generate, load_config};

/// Command line interface for servgen
#[derive(Parser, Debug)]
#[command(name = "servgen")]
#[command(about = "servgen - compile-time dependency wiring for Go services")]
#[command(version)]
pub struct Cli {
    /// Project root
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Path to an extra configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Manifest file or directory, overriding the configured one
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Resolve and print the schedule without writing files
    #[arg(long)]
    pub check: bool,
}

impl From<Cli> for RunOptions {
    fn from(cli: Cli) -> Self {
        Self {
            project_root: cli.path,
            config: cli.config,
            manifest: cli.manifest,
            check: cli.check,
        }
    }
}

fn main() -> ExitCode {
    let options = RunOptions::from(Cli::parse());
    match execute(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("servgen: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute(options: &RunOptions) -> anyhow::Result<()> {
    let config = load_config(options)?;
    init_logging(&config.logging)?;
    match generate(options, &config)? {
        RunOutcome::Checked(schedule) => print!("{schedule}"),
        RunOutcome::Generated(files) => {
            for file in files {
                println!("{}", file.display());
            }
        }
    }
    Ok(())
}
