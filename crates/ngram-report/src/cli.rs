use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::export::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "ngram-report",
    version,
    about = "Search-term n-gram analysis for advertising bulk sheets"
)]
pub struct Cli {
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyse one bulk sheet.
    Analyze(AnalyzeArgs),
    /// Analyse using a YAML run config.
    Run {
        #[arg(long, default_value = "ngram-report.yaml")]
        config: String,
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Bulk sheet workbook (.xlsx, .xls, .ods) or a directory of `<sheet>.csv` files.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Restrict the analysis to campaigns advertising this SKU. Repeatable.
    #[arg(long = "sku")]
    pub skus: Vec<String>,
    /// Newline-delimited SKU list.
    #[arg(long)]
    pub skus_file: Option<PathBuf>,
    /// Drop search terms containing this brand term. Repeatable.
    #[arg(long = "exclude")]
    pub exclusions: Vec<String>,
    /// Newline-delimited brand exclusion list.
    #[arg(long)]
    pub exclude_file: Option<PathBuf>,
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Extra stop words, one per line.
    #[arg(long)]
    pub stop_words: Option<PathBuf>,
    /// Lemma exceptions, `inflected<TAB>lemma` per line.
    #[arg(long)]
    pub lemma_exceptions: Option<PathBuf>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_lemmatize: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    pub first_sku_wins: bool,
    /// Print the run summary as JSON after the artifact path.
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,
}
