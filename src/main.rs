//! fieldpatch
//!
//! Migrates a string field on the plot configuration records to an optional
//! one and checks the result.
//!
//! Usage: `fieldpatch [--config FILE] [--verbose] [migrate|verify|fix-assignments|dump-config]`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use fieldpatch_lib::assignment_fix::fix_fallback_assignments;
use fieldpatch_lib::config::save_migration_config;
use fieldpatch_lib::verify::verify_files;
use fieldpatch_lib::{driver, init_tracing, load_migration_config, DriverOptions, MigrationConfig};

#[derive(Parser, Debug)]
#[command(name = "fieldpatch")]
#[command(about = "Rewrite a record field from T to Option<T> across a directory of sources")]
struct Cli {
    /// JSON config file; defaults apply to every missing key
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the migration pipeline over the directory (default)
    Migrate {
        /// Directory holding the source files
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Print diffs instead of writing files
        #[arg(long)]
        dry_run: bool,
    },
    /// Check that every listed file declares the optional field
    Verify {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Wrap fallback assignments to the field in Some(...)
    FixAssignments {
        /// File to rewrite
        file: Option<PathBuf>,
    },
    /// Write the effective configuration as JSON
    DumpConfig {
        /// Destination file
        #[arg(default_value = "fieldpatch.json")]
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => load_migration_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MigrationConfig::default(),
    };

    match cli.command.unwrap_or(Command::Migrate {
        dir: None,
        dry_run: false,
    }) {
        Command::Migrate { dir, dry_run } => {
            if let Some(dir) = dir {
                config.directory = dir;
            }
            driver::run(&config, DriverOptions { dry_run })
                .with_context(|| format!("Migration failed in {}", config.directory.display()))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify { dir } => {
            if let Some(dir) = dir {
                config.directory = dir;
            }
            let report = verify_files(&config).context("Verification failed")?;
            Ok(if report.all_good() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Command::FixAssignments { file } => {
            let path = file.unwrap_or_else(|| config.assignment_fix.path.clone());
            fix_fallback_assignments(&path, &config.field.name, &config.assignment_fix.receiver)
                .with_context(|| format!("Failed to fix {}", path.display()))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::DumpConfig { file } => {
            save_migration_config(&file, &config)
                .with_context(|| format!("Failed to write config {}", file.display()))?;
            println!("Wrote {}", file.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}
