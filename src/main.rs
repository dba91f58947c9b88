use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod core;
mod error;
mod models;

use commands::{list_failed_jobs, rerun_batch, RerunOptions};
use models::Environment;

/// tq-rerun - resubmit failed task-queue jobs to their message broker
#[derive(Parser)]
#[command(name = "tq-rerun")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to /content/<env>/rstar/etc/tq-rerun.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Environment (detected from the host name when omitted)
    #[arg(long, global = true, value_enum)]
    env: Option<Environment>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resubmit the failed jobs of a batch
    Rerun {
        /// Batch id
        batch_id: i64,

        /// Batch/job export as a JSON array ("-" for stdin)
        #[arg(short, long)]
        jobs: PathBuf,

        /// Extra command line args appended to each job's extra_args
        #[arg(short, long, default_value = "", allow_hyphen_values = true)]
        extra_args: String,

        /// Show what would be submitted without submitting
        #[arg(long)]
        dry_run: bool,

        /// Override the submission program
        #[arg(long)]
        program: Option<PathBuf>,

        /// Override the submission timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Override the broker host used when a job names none
        #[arg(long)]
        default_host: Option<String>,
    },

    /// List the failed jobs of a batch
    List {
        /// Batch id
        batch_id: i64,

        /// Batch/job export as a JSON array ("-" for stdin)
        #[arg(short, long)]
        jobs: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();

    let environment = cli.env.unwrap_or_else(Environment::detect);

    let result = match cli.command {
        Commands::Rerun {
            batch_id,
            jobs,
            extra_args,
            dry_run,
            program,
            timeout,
            default_host,
        } => {
            let options = RerunOptions {
                batch_id,
                jobs_file: jobs,
                extra_args,
                dry_run,
                config: cli.config,
                environment,
                program,
                timeout,
                default_host,
            };
            rerun_batch(options).await
        }

        Commands::List { batch_id, jobs } => {
            list_failed_jobs(batch_id, &jobs, cli.config, environment)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
