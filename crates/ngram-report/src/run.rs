use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use ngram_core::{
    analyze, load_exceptions, load_word_list, ArtifactKind, BulkSheet, Lexicon, NgramError,
    NounLemmatizer, PassThrough, RunSummary, Sheet,
};
use serde_yaml::from_str;
use tracing::{info, warn};

use crate::config::{AnalyzeSettings, LexiconConfig, ReportConfig, RunConfig};
use crate::export::{self, OutputFormat};
use crate::workbook;

#[derive(Debug)]
pub enum RunOutcome {
    Report {
        path: PathBuf,
        summary: RunSummary,
    },
    /// The run stopped on a reportable condition; `path` holds the diagnostic.
    Diagnostic { path: PathBuf, error: NgramError },
}

pub fn run_from_config(path: &str, defaults: &ReportConfig) -> Result<RunOutcome> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read config {path}"))?;
    let cfg: RunConfig = from_str(&raw).context("invalid ngram-report config")?;
    let settings = AnalyzeSettings::from_run_config(cfg, defaults)?;
    run_analysis(&settings)
}

pub fn run_analysis(settings: &AnalyzeSettings) -> Result<RunOutcome> {
    run_with(
        settings,
        workbook::read_sheets,
        export::write_artifact,
        Local::now().naive_local(),
    )
}

fn run_with<FRead, FWrite>(
    settings: &AnalyzeSettings,
    read_fn: FRead,
    write_fn: FWrite,
    timestamp: NaiveDateTime,
) -> Result<RunOutcome>
where
    FRead: Fn(&Path) -> Result<Vec<Sheet>>,
    FWrite: Fn(&Path, ArtifactKind, OutputFormat, &[Sheet], NaiveDateTime) -> Result<PathBuf>,
{
    let input = settings
        .input
        .as_deref()
        .ok_or(NgramError::NoFileProvided)?;
    let lexicon = build_lexicon(&settings.lexicon)?;
    info!(input = %input.display(), "reading bulk sheet");
    let sheets = read_fn(input)?;
    let bulk = BulkSheet::from_sheets(&sheets, settings.merge_policy)?;

    match analyze(&bulk, &settings.request, &lexicon) {
        Ok(analysis) => {
            let path = write_fn(
                &settings.output_dir,
                ArtifactKind::NgramAnalysisOutput,
                settings.format,
                &analysis.report.to_sheets(),
                timestamp,
            )?;
            Ok(RunOutcome::Report {
                path,
                summary: analysis.summary,
            })
        }
        Err(error) => match (error.artifact_kind(), error.diagnostic_tables()) {
            (Some(kind), Some(tables)) => {
                warn!(error = %error, "analysis stopped, writing diagnostic report");
                let path = write_fn(&settings.output_dir, kind, settings.format, &tables, timestamp)?;
                Ok(RunOutcome::Diagnostic { path, error })
            }
            _ => Err(error.into()),
        },
    }
}

/// Built once per run, before any sheet is read.
pub fn build_lexicon(cfg: &LexiconConfig) -> Result<Lexicon> {
    let lexicon = if cfg.lemmatize {
        let mut lemmatizer = NounLemmatizer::english();
        if let Some(path) = &cfg.lemma_exceptions_file {
            let exceptions = load_exceptions(path)
                .with_context(|| format!("failed to read lemma exceptions {}", path.display()))?;
            lemmatizer = lemmatizer.with_exceptions(exceptions);
        }
        Lexicon::english_with(lemmatizer)
    } else {
        Lexicon::english_with(PassThrough)
    };
    let mut extra = cfg.extra_stop_words.clone();
    if let Some(path) = &cfg.stop_words_file {
        extra.extend(
            load_word_list(path)
                .with_context(|| format!("failed to read stop words {}", path.display()))?,
        );
    }
    Ok(lexicon.with_stop_words(extra))
}
