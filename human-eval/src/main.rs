use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

mod config;
mod error;
mod model;
mod services;
mod telemetry;

use config::{SessionConfig, DEFAULT_SAMPLE_LIMIT};
use services::checkpoint::CheckpointPolicy;
use services::prompter::Prompter;
use services::session;

/// Collects human judgments on translated code-generation prompts.
#[derive(Parser, Debug)]
#[command(name = "human-eval", version)]
struct Cli {
    /// Folder holding one sub-folder of prompt files per language
    #[arg(long, env = "HUMAN_EVAL_DATA_DIR", default_value = "Data")]
    data_dir: PathBuf,

    /// Folder receiving one result file per dataset and language
    #[arg(long, env = "HUMAN_EVAL_RESULTS_DIR", default_value = "results")]
    results_dir: PathBuf,

    /// Only evaluate the first few pairs of each dataset
    #[arg(long, env = "HUMAN_EVAL_SAMPLE")]
    sample: bool,

    /// Pairs per dataset when --sample is set
    #[arg(long, default_value_t = DEFAULT_SAMPLE_LIMIT)]
    sample_limit: usize,

    /// Stop on unreadable result files instead of starting them over
    #[arg(long)]
    strict_checkpoints: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            data_dir: self.data_dir.clone(),
            results_dir: self.results_dir.clone(),
            sample_limit: self.sample.then_some(self.sample_limit),
            checkpoint_policy: if self.strict_checkpoints {
                CheckpointPolicy::Strict
            } else {
                CheckpointPolicy::Recover
            },
            ..SessionConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    telemetry::init_tracing(cli.json, level);

    let config = cli.session_config();
    info!(
        data_dir = %config.data_dir.display(),
        results_dir = %config.results_dir.display(),
        sample_limit = ?config.sample_limit,
        "starting evaluation session"
    );

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    session::run(&config, &mut prompter).context("evaluation session aborted")?;

    Ok(())
}
