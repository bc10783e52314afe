use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use csv::ReaderBuilder;
use ngram_core::{Cell, Sheet};
use tracing::debug;

/// Loads every sheet of a bulk sheet. `path` is either a workbook or a
/// directory holding one `<sheet name>.csv` per sheet.
pub fn read_sheets(path: &Path) -> Result<Vec<Sheet>> {
    fs::metadata(path).with_context(|| format!("failed to read bulk sheet {}", path.display()))?;
    if path.is_dir() {
        read_csv_dir(path)
    } else {
        read_workbook(path)
    }
}

fn read_workbook(path: &Path) -> Result<Vec<Sheet>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook {}", path.display()))?;
    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("failed to read sheet {name} in {}", path.display()))?;
        let sheet = sheet_from_range(&name, &range);
        debug!(sheet = %sheet.name, rows = sheet.rows.len(), "sheet loaded");
        sheets.push(sheet);
    }
    Ok(sheets)
}

fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| header.iter().map(|cell| cell.to_string()).collect::<Vec<_>>())
        .unwrap_or_default();
    let mut sheet = Sheet::new(name, headers);
    for row in rows {
        sheet.push_row(row.iter().map(convert_cell).collect());
    }
    sheet
}

fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Float(value) => Cell::Number(*value),
        Data::String(text) if text.trim().is_empty() => Cell::Empty,
        Data::String(text) => Cell::Text(text.clone()),
        other => Cell::Text(other.to_string()),
    }
}

fn read_csv_dir(dir: &Path) -> Result<Vec<Sheet>> {
    let mut paths = fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect::<Vec<_>>();
    paths.sort();
    paths.iter().map(|path| read_csv_sheet(path)).collect()
}

fn read_csv_sheet(path: &Path) -> Result<Sheet> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string();
    let file =
        fs::File::open(path).with_context(|| format!("failed to open CSV file {}", path.display()))?;
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = reader
        .headers()
        .map(|h| h.iter().map(|cell| cell.to_string()).collect::<Vec<_>>())
        .with_context(|| format!("missing headers in {}", path.display()))?;
    let mut sheet = Sheet::new(name, headers);
    for record in reader.records() {
        let record = record.with_context(|| format!("invalid row in {}", path.display()))?;
        sheet.push_row(
            record
                .iter()
                .map(|cell| {
                    if cell.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::text(cell)
                    }
                })
                .collect(),
        );
    }
    debug!(sheet = %sheet.name, rows = sheet.rows.len(), "csv sheet loaded");
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{write_artifact, OutputFormat};
    use chrono::NaiveDate;
    use ngram_core::ArtifactKind;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn csv_directory_becomes_named_sheets() {
        let dir = tempdir().unwrap();
        let mut terms = fs::File::create(dir.path().join("SP Search Term Report.csv")).unwrap();
        writeln!(terms, "Customer Search Term,Clicks").unwrap();
        writeln!(terms, "running shoes,3").unwrap();
        writeln!(terms, "wool socks,").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sheets = read_sheets(dir.path()).unwrap();
        assert_eq!(sheets.len(), 1);
        let sheet = &sheets[0];
        assert_eq!(sheet.name, "SP Search Term Report");
        assert_eq!(sheet.headers, vec!["Customer Search Term", "Clicks"]);
        assert_eq!(sheet.rows[0], vec![Cell::text("running shoes"), Cell::text("3")]);
        assert_eq!(sheet.rows[1][1], Cell::Empty);
    }

    #[test]
    fn xlsx_written_by_export_reads_back() {
        let dir = tempdir().unwrap();
        let mut sheet = Sheet::new(
            "SP Search Term Report",
            vec![String::from("Customer Search Term"), "SKU".into(), "Spend".into(), "Clicks".into()],
        );
        sheet.push_row(vec![
            Cell::text("running shoes"),
            Cell::Empty,
            Cell::Number(5.25),
            Cell::Number(3.0),
        ]);
        sheet.push_row(vec![
            Cell::text("wool socks"),
            Cell::text("sku-1"),
            Cell::Number(0.0),
            Cell::Number(12.0),
        ]);
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let path = write_artifact(
            dir.path(),
            ArtifactKind::NgramAnalysisOutput,
            OutputFormat::Xlsx,
            &[sheet],
            timestamp,
        )
        .unwrap();

        let sheets = read_sheets(&path).unwrap();
        assert_eq!(sheets.len(), 1);
        let read = &sheets[0];
        assert_eq!(read.name, "SP Search Term Report");
        assert_eq!(read.headers, vec!["Customer Search Term", "SKU", "Spend", "Clicks"]);
        assert_eq!(read.rows.len(), 2);
        assert_eq!(read.cell(0, 0), &Cell::text("running shoes"));
        assert_eq!(read.cell(0, 1), &Cell::Empty);
        assert_eq!(read.cell(0, 2), &Cell::Number(5.25));
        assert_eq!(read.cell(0, 3), &Cell::Number(3.0));
        assert_eq!(read.cell(1, 1), &Cell::text("sku-1"));
        assert_eq!(read.cell(1, 2), &Cell::Number(0.0));
    }

    #[test]
    fn missing_input_is_reported() {
        let err = read_sheets(Path::new("/definitely/not/here.xlsx")).unwrap_err();
        assert!(err.to_string().contains("failed to read bulk sheet"));
    }

    #[test]
    fn non_workbook_file_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not a workbook").unwrap();
        assert!(read_sheets(file.path()).is_err());
    }

    #[test]
    fn calamine_cells_convert() {
        assert_eq!(convert_cell(&Data::Int(4)), Cell::Number(4.0));
        assert_eq!(convert_cell(&Data::String(" ".into())), Cell::Empty);
        assert_eq!(convert_cell(&Data::Bool(true)), Cell::text("true"));
    }
}
