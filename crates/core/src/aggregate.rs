use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use crate::lexicon::Lexicon;
use crate::model::{Metrics, SearchTermRecord};
use crate::ngram::{extract, NGram, NGramOrder};
use crate::normalization::normalize;

/// Summed metrics for one n-gram plus ratios derived from those sums.
///
/// A ratio is `None` when its denominator sums to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NGramAggregate {
    pub ngram: NGram,
    pub metrics: Metrics,
    pub ctr: Option<f64>,
    pub conversion_rate: Option<f64>,
    pub acos: Option<f64>,
    pub cpa: Option<f64>,
    pub cpc: Option<f64>,
}

impl NGramAggregate {
    pub fn from_sums(ngram: NGram, metrics: Metrics) -> Self {
        Self {
            ctr: ratio(metrics.clicks, metrics.impressions),
            conversion_rate: ratio(metrics.units, metrics.clicks),
            acos: ratio(metrics.spend, metrics.sales),
            cpa: ratio(metrics.spend, metrics.units),
            cpc: ratio(metrics.spend, metrics.clicks),
            ngram,
            metrics,
        }
    }
}

pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Normalizes every record's search term, extracts n-grams of `order` and
/// sums the record's metrics once per occurrence.
pub fn aggregate(
    records: &[SearchTermRecord],
    order: NGramOrder,
    lexicon: &Lexicon,
) -> Vec<NGramAggregate> {
    let tokenized = tokenize_records(records, lexicon);
    aggregate_tokenized(&tokenized, order)
}

pub(crate) fn tokenize_records<'a>(
    records: &'a [SearchTermRecord],
    lexicon: &Lexicon,
) -> Vec<(Vec<String>, &'a Metrics)> {
    records
        .iter()
        .map(|record| (normalize(&record.search_term, lexicon), &record.metrics))
        .collect()
}

pub(crate) fn aggregate_tokenized(
    tokenized: &[(Vec<String>, &Metrics)],
    order: NGramOrder,
) -> Vec<NGramAggregate> {
    let mut sums: FxHashMap<NGram, Metrics> = FxHashMap::default();
    for (tokens, metrics) in tokenized {
        for ngram in extract(tokens, order) {
            *sums.entry(ngram).or_default() += *metrics;
        }
    }
    let mut rows: Vec<NGramAggregate> = sums
        .into_iter()
        .map(|(ngram, metrics)| NGramAggregate::from_sums(ngram, metrics))
        .collect();
    sort_rows(&mut rows);
    rows
}

/// Descending spend; equal spend falls back to ascending n-gram order.
pub fn sort_rows(rows: &mut [NGramAggregate]) {
    rows.sort_by(spend_order);
}

pub fn spend_order(a: &NGramAggregate, b: &NGramAggregate) -> Ordering {
    b.metrics
        .spend
        .total_cmp(&a.metrics.spend)
        .then_with(|| a.ngram.cmp(&b.ngram))
}
