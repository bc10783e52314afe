use thiserror::Error;

use crate::artifact::ArtifactKind;
use crate::model::CampaignSkuMap;
use crate::sheet::{Cell, Sheet};

#[derive(Error, Debug)]
pub enum NgramError {
    #[error("no bulk sheet provided")]
    NoFileProvided,
    #[error("no campaigns found for the specified SKUs ({} unmapped)", unmatched_skus.len())]
    NoMatchingCampaigns {
        unmatched_skus: Vec<String>,
        mapping: CampaignSkuMap,
    },
    #[error("the filtered dataset is empty; check the input SKUs and campaign mappings")]
    EmptyFilteredDataset {
        mapping: CampaignSkuMap,
        campaigns_with_terms: Vec<String>,
    },
    #[error("sheet {sheet:?} is missing required column {column:?}")]
    MissingColumn { sheet: String, column: String },
    #[error("bulk sheet has no sheet named {0:?}")]
    MissingSheet(String),
    #[error("sheet {sheet:?} row {row} column {column:?}: not a number: {value:?}")]
    InvalidValue {
        sheet: String,
        row: usize,
        column: String,
        value: String,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NgramError>;

impl NgramError {
    /// Which artifact a diagnostic condition should be written to, if any.
    pub fn artifact_kind(&self) -> Option<ArtifactKind> {
        match self {
            NgramError::NoMatchingCampaigns { .. } => Some(ArtifactKind::ErrorReport),
            NgramError::EmptyFilteredDataset { .. } => Some(ArtifactKind::EmptyDatasetReport),
            _ => None,
        }
    }

    /// Tables making up the downloadable diagnostic for this condition.
    pub fn diagnostic_tables(&self) -> Option<Vec<Sheet>> {
        match self {
            NgramError::NoMatchingCampaigns {
                unmatched_skus,
                mapping,
            } => {
                let mut unmapped = Sheet::new("Unmapped SKUs", ["Unmapped SKUs"]);
                for sku in unmatched_skus {
                    unmapped.push_row(vec![Cell::text(sku)]);
                }
                Some(vec![unmapped, mapping.to_sheet()])
            }
            NgramError::EmptyFilteredDataset {
                mapping,
                campaigns_with_terms,
            } => {
                let mut with_terms =
                    Sheet::new("SKUs with Search Terms", ["SKUs with Search Terms"]);
                for campaign in campaigns_with_terms {
                    let cell = mapping
                        .sku_for(campaign)
                        .map(Cell::text)
                        .unwrap_or(Cell::Empty);
                    with_terms.push_row(vec![cell]);
                }
                Some(vec![mapping.to_sheet(), with_terms])
            }
            _ => None,
        }
    }
}
