mod aggregate;
mod artifact;
mod bulk;
mod error;
mod filter;
mod lexicon;
mod model;
mod ngram;
mod normalization;
mod pipeline;
mod report;
mod sheet;

pub use aggregate::{aggregate, ratio, sort_rows, spend_order, NGramAggregate};
pub use artifact::{ArtifactKind, TIMESTAMP_FORMAT};
pub use bulk::{
    BulkSheet, CAMPAIGN_COLUMN, CAMPAIGN_SHEET_MARKER, CLICKS_COLUMN, IMPRESSIONS_COLUMN,
    SALES_COLUMN, SEARCH_TERM_COLUMN, SEARCH_TERM_SHEET, SKU_COLUMN, SPEND_COLUMN, UNITS_COLUMN,
};
pub use error::{NgramError, Result};
pub use filter::{exclude_brand_terms, filter_by_sku};
pub use lexicon::{
    load_exceptions, load_word_list, Lemmatizer, Lexicon, NounLemmatizer, PassThrough,
    ADDITIONAL_STOP_WORDS, ENGLISH_STOP_WORDS,
};
pub use model::{CampaignSkuMap, MergePolicy, Metrics, SearchTermRecord};
pub use ngram::{extract, NGram, NGramOrder};
pub use normalization::normalize;
pub use pipeline::{analyze, Analysis, AnalysisRequest, RunSummary, SkuMode};
pub use report::{assemble, Report, ReportRow, AGGREGATE_COLUMNS, ORDER_COLUMN, REPORT_SHEET};
pub use sheet::{Cell, Sheet};
