mod cli;
mod config;
mod export;
mod logging;
mod run;
mod workbook;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::error;

use crate::cli::{Cli, Command};
use crate::config::{AnalyzeSettings, ReportConfig};
use crate::run::RunOutcome;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = if cli.verbose {
        true
    } else {
        logging::env_flag()
    };
    logging::init(verbose);
    let defaults = ReportConfig::from_env()?;
    let (outcome, json) = match cli.command {
        Command::Analyze(args) => {
            let json = args.json;
            let settings = AnalyzeSettings::from_args(args, &defaults)?;
            (run::run_analysis(&settings)?, json)
        }
        Command::Run { config, json } => (run::run_from_config(&config, &defaults)?, json),
    };
    match outcome {
        RunOutcome::Report { path, summary } => {
            println!("{}", path.display());
            if json {
                println!("{}", serde_json::to_string(&summary)?);
            }
            Ok(())
        }
        RunOutcome::Diagnostic { path, error } => {
            error!(report = %path.display(), "{error}");
            println!("{}", path.display());
            bail!("{error}; diagnostic report written to {}", path.display())
        }
    }
}
