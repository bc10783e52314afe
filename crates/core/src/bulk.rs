//! Decoding of an advertising bulk sheet into search-term records and the
//! campaign to SKU mapping.

use tracing::{debug, info};

use crate::error::{NgramError, Result};
use crate::model::{CampaignSkuMap, MergePolicy, Metrics, SearchTermRecord};
use crate::sheet::{Cell, Sheet};

pub const CAMPAIGN_SHEET_MARKER: &str = "Sponsored Products Campaigns";
pub const SEARCH_TERM_SHEET: &str = "SP Search Term Report";

pub const CAMPAIGN_COLUMN: &str = "Campaign Name (Informational only)";
pub const SKU_COLUMN: &str = "SKU";
pub const SEARCH_TERM_COLUMN: &str = "Customer Search Term";
pub const IMPRESSIONS_COLUMN: &str = "Impressions";
pub const CLICKS_COLUMN: &str = "Clicks";
pub const SPEND_COLUMN: &str = "Spend";
pub const SALES_COLUMN: &str = "Sales";
pub const UNITS_COLUMN: &str = "Units";

#[derive(Debug, Clone, Default)]
pub struct BulkSheet {
    pub campaign_skus: CampaignSkuMap,
    pub search_terms: Vec<SearchTermRecord>,
}

impl BulkSheet {
    pub fn from_sheets(sheets: &[Sheet], policy: MergePolicy) -> Result<Self> {
        let mut campaign_skus = CampaignSkuMap::new(policy);
        for sheet in sheets
            .iter()
            .filter(|sheet| sheet.name.contains(CAMPAIGN_SHEET_MARKER))
        {
            read_campaign_sheet(sheet, &mut campaign_skus)?;
        }
        let search_sheet = sheets
            .iter()
            .find(|sheet| sheet.name == SEARCH_TERM_SHEET)
            .ok_or_else(|| NgramError::MissingSheet(SEARCH_TERM_SHEET.to_string()))?;
        let search_terms = read_search_terms(search_sheet)?;
        info!(
            campaigns = campaign_skus.len(),
            search_terms = search_terms.len(),
            "bulk sheet decoded"
        );
        Ok(Self {
            campaign_skus,
            search_terms,
        })
    }
}

fn read_campaign_sheet(sheet: &Sheet, map: &mut CampaignSkuMap) -> Result<()> {
    let campaign_col = require_column(sheet, CAMPAIGN_COLUMN)?;
    let sku_col = require_column(sheet, SKU_COLUMN)?;
    let mut mapped = 0usize;
    for row in 0..sheet.rows.len() {
        let sku = sheet.cell(row, sku_col);
        if sku.is_empty() {
            continue;
        }
        map.insert(sheet.cell(row, campaign_col).to_string(), sku.to_string());
        mapped += 1;
    }
    debug!(sheet = %sheet.name, rows = mapped, "campaign sheet mapped");
    Ok(())
}

fn read_search_terms(sheet: &Sheet) -> Result<Vec<SearchTermRecord>> {
    let campaign_col = require_column(sheet, CAMPAIGN_COLUMN)?;
    let term_col = require_column(sheet, SEARCH_TERM_COLUMN)?;
    let metric = |column: &'static str| require_column(sheet, column).map(|idx| (column, idx));
    let impressions = metric(IMPRESSIONS_COLUMN)?;
    let clicks = metric(CLICKS_COLUMN)?;
    let spend = metric(SPEND_COLUMN)?;
    let sales = metric(SALES_COLUMN)?;
    let units = metric(UNITS_COLUMN)?;

    let mut records = Vec::with_capacity(sheet.rows.len());
    for row in 0..sheet.rows.len() {
        let number = |(column, col): (&str, usize)| numeric(sheet, row, column, col);
        let metrics = Metrics {
            impressions: number(impressions)?,
            clicks: number(clicks)?,
            spend: number(spend)?,
            sales: number(sales)?,
            units: number(units)?,
        };
        records.push(SearchTermRecord::new(
            sheet.cell(row, campaign_col).to_string(),
            sheet.cell(row, term_col).to_string(),
            metrics,
        ));
    }
    Ok(records)
}

fn require_column(sheet: &Sheet, column: &str) -> Result<usize> {
    sheet
        .column_index(column)
        .ok_or_else(|| NgramError::MissingColumn {
            sheet: sheet.name.clone(),
            column: column.to_string(),
        })
}

/// Metrics must be finite and non-negative; empty cells count as zero.
fn numeric(sheet: &Sheet, row: usize, column: &str, col: usize) -> Result<f64> {
    let invalid = |value: String| NgramError::InvalidValue {
        sheet: sheet.name.clone(),
        // header row is row 1 in the workbook
        row: row + 2,
        column: column.to_string(),
        value,
    };
    let value = match sheet.cell(row, col) {
        Cell::Number(value) => *value,
        Cell::Empty => return Ok(0.0),
        Cell::Text(text) => {
            let cleaned = text.trim().replace(',', "");
            if cleaned.is_empty() {
                return Ok(0.0);
            }
            cleaned
                .trim_start_matches('$')
                .parse::<f64>()
                .map_err(|_| invalid(text.clone()))?
        }
    };
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(invalid(sheet.cell(row, col).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign_sheet(name: &str, rows: &[(&str, Option<&str>)]) -> Sheet {
        let mut sheet = Sheet::new(name, ["Entity", CAMPAIGN_COLUMN, SKU_COLUMN]);
        for (campaign, sku) in rows {
            sheet.push_row(vec![
                Cell::text("Product Ad"),
                Cell::text(*campaign),
                sku.map(Cell::text).unwrap_or(Cell::Empty),
            ]);
        }
        sheet
    }

    fn search_sheet() -> Sheet {
        let mut sheet = Sheet::new(
            SEARCH_TERM_SHEET,
            [
                CAMPAIGN_COLUMN,
                SEARCH_TERM_COLUMN,
                IMPRESSIONS_COLUMN,
                CLICKS_COLUMN,
                SPEND_COLUMN,
                SALES_COLUMN,
                UNITS_COLUMN,
            ],
        );
        sheet.push_row(vec![
            Cell::text("Camp A"),
            Cell::text("running shoes"),
            Cell::Number(100.0),
            Cell::Number(10.0),
            Cell::text("5.25"),
            Cell::text("1,050.00"),
            Cell::Empty,
        ]);
        sheet
    }

    #[test]
    fn decodes_campaigns_and_search_terms() {
        let sheets = vec![
            campaign_sheet(
                "Sponsored Products Campaigns",
                &[("Camp A", Some("sku-1")), ("Camp A", None), ("Camp B", Some("sku-2"))],
            ),
            campaign_sheet("Sponsored Products Campaigns (2)", &[("Camp C", Some("sku-3"))]),
            campaign_sheet("Sponsored Brands Campaigns", &[("Camp D", Some("sku-4"))]),
            search_sheet(),
        ];
        let bulk = BulkSheet::from_sheets(&sheets, MergePolicy::LastWriteWins).unwrap();
        assert_eq!(bulk.campaign_skus.len(), 3);
        assert_eq!(bulk.campaign_skus.sku_for("Camp A"), Some("sku-1"));
        assert_eq!(bulk.campaign_skus.sku_for("Camp D"), None);
        let record = &bulk.search_terms[0];
        assert_eq!(record.search_term, "running shoes");
        assert_eq!(record.metrics.spend, 5.25);
        assert_eq!(record.metrics.sales, 1050.0);
        assert_eq!(record.metrics.units, 0.0);
    }

    #[test]
    fn missing_search_term_sheet_is_named() {
        let err = BulkSheet::from_sheets(&[], MergePolicy::default()).unwrap_err();
        assert!(matches!(err, NgramError::MissingSheet(name) if name == SEARCH_TERM_SHEET));
    }

    #[test]
    fn missing_column_is_named() {
        let mut sheet = search_sheet();
        sheet.headers[3] = "Click".into();
        let err = BulkSheet::from_sheets(&[sheet], MergePolicy::default()).unwrap_err();
        match err {
            NgramError::MissingColumn { sheet, column } => {
                assert_eq!(sheet, SEARCH_TERM_SHEET);
                assert_eq!(column, CLICKS_COLUMN);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_numeric_metric_is_rejected() {
        let mut sheet = search_sheet();
        sheet.rows[0][2] = Cell::text("lots");
        let err = BulkSheet::from_sheets(&[sheet], MergePolicy::default()).unwrap_err();
        assert!(matches!(err, NgramError::InvalidValue { row: 2, .. }));
    }

    #[test]
    fn nan_infinite_and_negative_metrics_are_rejected() {
        let bad_values = [
            Cell::text("NaN"),
            Cell::text("inf"),
            Cell::text("-5"),
            Cell::Number(f64::NAN),
            Cell::Number(-1.0),
        ];
        for bad in bad_values {
            let mut sheet = search_sheet();
            sheet.rows[0][4] = bad.clone();
            let err = BulkSheet::from_sheets(&[sheet], MergePolicy::default()).unwrap_err();
            match err {
                NgramError::InvalidValue { column, row, .. } => {
                    assert_eq!(column, SPEND_COLUMN, "{bad:?}");
                    assert_eq!(row, 2);
                }
                other => panic!("unexpected error {other:?} for {bad:?}"),
            }
        }
    }

    #[test]
    fn zero_and_formatted_metrics_are_accepted() {
        let mut sheet = search_sheet();
        sheet.rows[0][4] = Cell::text("$0.00");
        let bulk = BulkSheet::from_sheets(&[sheet], MergePolicy::default()).unwrap();
        assert_eq!(bulk.search_terms[0].metrics.spend, 0.0);
    }
}
