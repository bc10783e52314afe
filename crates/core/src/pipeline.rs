use indexmap::IndexSet;
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::{aggregate_tokenized, tokenize_records};
use crate::bulk::BulkSheet;
use crate::error::{NgramError, Result};
use crate::filter::{exclude_brand_terms, filter_by_sku};
use crate::lexicon::Lexicon;
use crate::ngram::NGramOrder;
use crate::report::{assemble, Report};

/// Which part of the bulk sheet to analyse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SkuMode {
    #[default]
    FullBulkSheet,
    SpecificSkus(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub sku_mode: SkuMode,
    pub brand_exclusions: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub records_in: usize,
    pub records_after_sku_filter: usize,
    pub records_excluded: usize,
    pub monograms: usize,
    pub bigrams: usize,
    pub trigrams: usize,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub report: Report,
    pub summary: RunSummary,
}

/// Runs SKU filtering, brand exclusion and the three n-gram aggregations over
/// a decoded bulk sheet.
pub fn analyze(
    bulk: &BulkSheet,
    request: &AnalysisRequest,
    lexicon: &Lexicon,
) -> Result<Analysis> {
    let mut summary = RunSummary {
        records_in: bulk.search_terms.len(),
        ..RunSummary::default()
    };

    let selected = match &request.sku_mode {
        SkuMode::FullBulkSheet => bulk.search_terms.clone(),
        SkuMode::SpecificSkus(skus) => {
            filter_by_sku(&bulk.search_terms, &bulk.campaign_skus, skus).inspect_err(|err| {
                warn!(error = %err, "sku selection matched no campaigns");
            })?
        }
    };
    summary.records_after_sku_filter = selected.len();

    if selected.is_empty() {
        let campaigns_with_terms: IndexSet<&str> = bulk
            .search_terms
            .iter()
            .map(|record| record.campaign_name.as_str())
            .collect();
        return Err(NgramError::EmptyFilteredDataset {
            mapping: bulk.campaign_skus.clone(),
            campaigns_with_terms: campaigns_with_terms
                .into_iter()
                .map(str::to_string)
                .collect(),
        });
    }

    let records = exclude_brand_terms(&selected, &request.brand_exclusions);
    summary.records_excluded = selected.len() - records.len();

    let tokenized = tokenize_records(&records, lexicon);
    let [monograms, bigrams, trigrams] =
        NGramOrder::ALL.map(|order| aggregate_tokenized(&tokenized, order));
    summary.monograms = monograms.len();
    summary.bigrams = bigrams.len();
    summary.trigrams = trigrams.len();

    info!(
        records = summary.records_in,
        analysed = records.len(),
        excluded = summary.records_excluded,
        monograms = summary.monograms,
        bigrams = summary.bigrams,
        trigrams = summary.trigrams,
        "n-gram analysis finished"
    );
    Ok(Analysis {
        report: assemble(monograms, bigrams, trigrams),
        summary,
    })
}
