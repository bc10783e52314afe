use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use ngram_core::{AnalysisRequest, MergePolicy, SkuMode};
use serde::Deserialize;

use crate::cli::AnalyzeArgs;
use crate::export::OutputFormat;

/// Defaults taken from the environment.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub format: OutputFormat,
}

impl ReportConfig {
    pub fn from_env() -> Result<Self> {
        let output_dir = env::var("NGRAM_REPORT_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let format = match env::var("NGRAM_REPORT_FORMAT") {
            Ok(raw) => OutputFormat::from_name(&raw)
                .ok_or_else(|| anyhow!(format!("unknown output format {raw}")))?,
            Err(_) => OutputFormat::Xlsx,
        };
        Ok(Self { output_dir, format })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkuModeConfig {
    #[default]
    FullBulkSheet,
    SpecificSkus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LexiconConfig {
    #[serde(default = "default_lemmatize")]
    pub lemmatize: bool,
    #[serde(default)]
    pub stop_words_file: Option<PathBuf>,
    #[serde(default)]
    pub extra_stop_words: Vec<String>,
    #[serde(default)]
    pub lemma_exceptions_file: Option<PathBuf>,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            lemmatize: default_lemmatize(),
            stop_words_file: None,
            extra_stop_words: Vec::new(),
            lemma_exceptions_file: None,
        }
    }
}

fn default_lemmatize() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub sku_mode: SkuModeConfig,
    #[serde(default)]
    pub skus: Vec<String>,
    #[serde(default)]
    pub skus_file: Option<PathBuf>,
    #[serde(default)]
    pub brand_exclusions: Vec<String>,
    #[serde(default)]
    pub brand_exclusions_file: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
    #[serde(default)]
    pub merge_policy: MergePolicy,
    #[serde(default)]
    pub lexicon: LexiconConfig,
}

/// Everything a single analysis run needs, resolved from CLI flags or a run
/// config.
#[derive(Debug, Clone)]
pub struct AnalyzeSettings {
    pub input: Option<PathBuf>,
    pub request: AnalysisRequest,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub merge_policy: MergePolicy,
    pub lexicon: LexiconConfig,
}

impl AnalyzeSettings {
    pub fn from_args(args: AnalyzeArgs, defaults: &ReportConfig) -> Result<Self> {
        let skus = with_file_entries(args.skus, args.skus_file.as_deref())?;
        let sku_mode = if skus.is_empty() {
            SkuMode::FullBulkSheet
        } else {
            SkuMode::SpecificSkus(skus)
        };
        let brand_exclusions = with_file_entries(args.exclusions, args.exclude_file.as_deref())?;
        Ok(Self {
            input: args.input,
            request: AnalysisRequest {
                sku_mode,
                brand_exclusions,
            },
            output_dir: args.output_dir.unwrap_or_else(|| defaults.output_dir.clone()),
            format: args.format.unwrap_or(defaults.format),
            merge_policy: if args.first_sku_wins {
                MergePolicy::FirstWriteWins
            } else {
                MergePolicy::LastWriteWins
            },
            lexicon: LexiconConfig {
                lemmatize: !args.no_lemmatize,
                stop_words_file: args.stop_words,
                extra_stop_words: Vec::new(),
                lemma_exceptions_file: args.lemma_exceptions,
            },
        })
    }

    pub fn from_run_config(cfg: RunConfig, defaults: &ReportConfig) -> Result<Self> {
        let sku_mode = match cfg.sku_mode {
            SkuModeConfig::FullBulkSheet => SkuMode::FullBulkSheet,
            SkuModeConfig::SpecificSkus => {
                SkuMode::SpecificSkus(with_file_entries(cfg.skus, cfg.skus_file.as_deref())?)
            }
        };
        let brand_exclusions =
            with_file_entries(cfg.brand_exclusions, cfg.brand_exclusions_file.as_deref())?;
        Ok(Self {
            input: cfg.input,
            request: AnalysisRequest {
                sku_mode,
                brand_exclusions,
            },
            output_dir: cfg.output_dir.unwrap_or_else(|| defaults.output_dir.clone()),
            format: cfg.format.unwrap_or(defaults.format),
            merge_policy: cfg.merge_policy,
            lexicon: cfg.lexicon,
        })
    }
}

/// Inline entries followed by the lines of `file`, blank lines dropped.
fn with_file_entries(mut entries: Vec<String>, file: Option<&Path>) -> Result<Vec<String>> {
    if let Some(path) = file {
        // SKUs and brand terms are matched verbatim, so no case folding or comments here
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read list file {}", path.display()))?;
        entries.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    entries.retain(|entry| !entry.trim().is_empty());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn defaults() -> ReportConfig {
        ReportConfig {
            output_dir: PathBuf::from("reports"),
            format: OutputFormat::Xlsx,
        }
    }

    #[test]
    fn cli_skus_switch_to_specific_mode() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "SKU-2\n\n  sku-3  ").unwrap();
        let args = AnalyzeArgs {
            skus: vec!["SKU-1".into()],
            skus_file: Some(file.path().to_path_buf()),
            exclusions: vec!["acme".into(), " ".into()],
            ..AnalyzeArgs::default()
        };
        let settings = AnalyzeSettings::from_args(args, &defaults()).unwrap();
        assert_eq!(
            settings.request.sku_mode,
            SkuMode::SpecificSkus(vec!["SKU-1".into(), "SKU-2".into(), "sku-3".into()])
        );
        assert_eq!(settings.request.brand_exclusions, vec!["acme"]);
        assert_eq!(settings.output_dir, PathBuf::from("reports"));
        assert!(settings.lexicon.lemmatize);
    }

    #[test]
    fn list_files_keep_case_and_hash_prefixed_entries() {
        let mut skus = NamedTempFile::new().unwrap();
        writeln!(skus, "#BLUE-42\r\nAbC-7").unwrap();
        let mut brands = NamedTempFile::new().unwrap();
        writeln!(brands, "# Acme\nNike").unwrap();
        let args = AnalyzeArgs {
            skus_file: Some(skus.path().to_path_buf()),
            exclude_file: Some(brands.path().to_path_buf()),
            ..AnalyzeArgs::default()
        };
        let settings = AnalyzeSettings::from_args(args, &defaults()).unwrap();
        assert_eq!(
            settings.request.sku_mode,
            SkuMode::SpecificSkus(vec!["#BLUE-42".into(), "AbC-7".into()])
        );
        assert_eq!(settings.request.brand_exclusions, vec!["# Acme", "Nike"]);
    }

    #[test]
    fn no_skus_means_full_sheet() {
        let settings = AnalyzeSettings::from_args(AnalyzeArgs::default(), &defaults()).unwrap();
        assert_eq!(settings.request.sku_mode, SkuMode::FullBulkSheet);
        assert_eq!(settings.merge_policy, MergePolicy::LastWriteWins);
    }

    #[test]
    fn run_config_parses_from_yaml() {
        let raw = r#"
input: bulk.xlsx
sku_mode: specific_skus
skus: [SKU-1]
brand_exclusions: [acme, contoso]
format: csv
merge_policy: first_write_wins
lexicon:
  extra_stop_words: [pack]
"#;
        let cfg: RunConfig = serde_yaml::from_str(raw).unwrap();
        let settings = AnalyzeSettings::from_run_config(cfg, &defaults()).unwrap();
        assert_eq!(settings.input, Some(PathBuf::from("bulk.xlsx")));
        assert_eq!(
            settings.request.sku_mode,
            SkuMode::SpecificSkus(vec!["SKU-1".into()])
        );
        assert_eq!(settings.format, OutputFormat::Csv);
        assert_eq!(settings.merge_policy, MergePolicy::FirstWriteWins);
        assert!(settings.lexicon.lemmatize);
        assert_eq!(settings.lexicon.extra_stop_words, vec!["pack"]);
    }

    #[test]
    fn minimal_run_config_uses_defaults() {
        let cfg: RunConfig = serde_yaml::from_str("skus: [ignored]").unwrap();
        let settings = AnalyzeSettings::from_run_config(cfg, &defaults()).unwrap();
        assert!(settings.input.is_none());
        assert_eq!(settings.request.sku_mode, SkuMode::FullBulkSheet);
        assert_eq!(settings.format, OutputFormat::Xlsx);
    }
}
