use crate::aggregate::NGramAggregate;
use crate::ngram::NGramOrder;
use crate::sheet::{Cell, Sheet};

pub const REPORT_SHEET: &str = "Report";
pub const ORDER_COLUMN: &str = "N-Gram Type";
pub const AGGREGATE_COLUMNS: [&str; 11] = [
    "N-Gram",
    "Impressions",
    "Clicks",
    "Spend",
    "Sales",
    "Units",
    "CTR",
    "Conversion Rate",
    "ACOS",
    "CPA",
    "CPC",
];

/// Row of the combined table, tagged with the order it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub order: NGramOrder,
    pub aggregate: NGramAggregate,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub monograms: Vec<NGramAggregate>,
    pub bigrams: Vec<NGramAggregate>,
    pub trigrams: Vec<NGramAggregate>,
    pub combined: Vec<ReportRow>,
}

/// Concatenates the three tables, monograms first, keeping each table's order.
pub fn assemble(
    monograms: Vec<NGramAggregate>,
    bigrams: Vec<NGramAggregate>,
    trigrams: Vec<NGramAggregate>,
) -> Report {
    let combined = [
        (NGramOrder::Monogram, &monograms),
        (NGramOrder::Bigram, &bigrams),
        (NGramOrder::Trigram, &trigrams),
    ]
    .into_iter()
    .flat_map(|(order, rows)| {
        rows.iter().cloned().map(move |aggregate| ReportRow { order, aggregate })
    })
    .collect();
    Report {
        monograms,
        bigrams,
        trigrams,
        combined,
    }
}

impl Report {
    pub fn table(&self, order: NGramOrder) -> &[NGramAggregate] {
        match order {
            NGramOrder::Monogram => &self.monograms,
            NGramOrder::Bigram => &self.bigrams,
            NGramOrder::Trigram => &self.trigrams,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.combined.is_empty()
    }

    /// One sheet per order followed by the combined `Report` sheet.
    pub fn to_sheets(&self) -> Vec<Sheet> {
        let mut sheets: Vec<Sheet> = NGramOrder::ALL
            .iter()
            .map(|&order| {
                let mut sheet = Sheet::new(order.label(), AGGREGATE_COLUMNS);
                for row in self.table(order) {
                    sheet.push_row(aggregate_cells(row));
                }
                sheet
            })
            .collect();
        let mut report = Sheet::new(
            REPORT_SHEET,
            std::iter::once(ORDER_COLUMN).chain(AGGREGATE_COLUMNS),
        );
        for row in &self.combined {
            let mut cells = vec![Cell::text(row.order.label())];
            cells.extend(aggregate_cells(&row.aggregate));
            report.push_row(cells);
        }
        sheets.push(report);
        sheets
    }
}

fn aggregate_cells(row: &NGramAggregate) -> Vec<Cell> {
    let m = &row.metrics;
    vec![
        Cell::text(row.ngram.to_string()),
        Cell::number(m.impressions),
        Cell::number(m.clicks),
        Cell::number(m.spend),
        Cell::number(m.sales),
        Cell::number(m.units),
        Cell::ratio(row.ctr),
        Cell::ratio(row.conversion_rate),
        Cell::ratio(row.acos),
        Cell::ratio(row.cpa),
        Cell::ratio(row.cpc),
    ]
}
