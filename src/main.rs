//! maven-lane CLI
//!
//! Entry point for the `maven-lane` command-line tool.

use clap::{Parser, Subcommand};
use maven_lane::{EffectiveConfig, Job, MavenRunner};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Exit code for a run that completed with a failed outcome.
const EXIT_FAILED: i32 = 1;
/// Exit code for errors that prevented a run from producing an outcome.
const EXIT_ERROR: i32 = 2;

#[derive(Parser)]
#[command(name = "maven-lane")]
#[command(about = "Run Maven builds and collect Surefire test reports", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a job and print its outcome as JSON
    Run {
        /// Path to the job description (JSON)
        #[arg(long, short = 'j')]
        job: PathBuf,

        /// Base data directory (overrides config and RUNNER_DATADIR)
        #[arg(long, short = 'd')]
        data_dir: Option<PathBuf>,

        /// Path to a TOML config file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Pretty-print the outcome
        #[arg(long)]
        pretty: bool,
    },

    /// Print the effective configuration
    Config {
        /// Path to a TOML config file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            job,
            data_dir,
            config,
            pretty,
        } => {
            run_job(&job, data_dir, config, pretty);
        }
        Commands::Config { config } => {
            run_config(config);
        }
    }
}

fn run_job(job_path: &Path, data_dir: Option<PathBuf>, config_path: Option<PathBuf>, pretty: bool) {
    let cli_layer = data_dir.map(|dir| serde_json::json!({ "data_dir": dir }));

    let effective = match EffectiveConfig::load(config_path.as_deref(), cli_layer) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(EXIT_ERROR);
        }
    };

    let job = match load_job(job_path) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("Error loading job {}: {}", job_path.display(), e);
            process::exit(EXIT_ERROR);
        }
    };

    let runner = MavenRunner::new(effective.config);
    let outcome = match runner.run(&job) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_ERROR);
        }
    };

    let json = if pretty {
        serde_json::to_string_pretty(&outcome)
    } else {
        serde_json::to_string(&outcome)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing outcome: {}", e);
            process::exit(EXIT_ERROR);
        }
    }

    if !outcome.is_passed() {
        process::exit(EXIT_FAILED);
    }
}

fn run_config(config_path: Option<PathBuf>) {
    let effective = match EffectiveConfig::load(config_path.as_deref(), None) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(EXIT_ERROR);
        }
    };

    match effective.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            process::exit(EXIT_ERROR);
        }
    }
}

fn load_job(path: &Path) -> Result<Job, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}
