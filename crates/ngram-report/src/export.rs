use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::ValueEnum;
use csv::WriterBuilder;
use ngram_core::{ArtifactKind, Cell, Sheet};
use rust_xlsxwriter::Workbook;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One workbook, one worksheet per table.
    Xlsx,
    /// One directory, one `<sheet>.csv` per table.
    Csv,
}

impl OutputFormat {
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "xlsx" => Some(OutputFormat::Xlsx),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "",
        }
    }
}

/// Writes `sheets` as the artifact `kind` under `dir` and returns its path.
pub fn write_artifact(
    dir: &Path,
    kind: ArtifactKind,
    format: OutputFormat,
    sheets: &[Sheet],
    timestamp: NaiveDateTime,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let path = dir.join(kind.file_name(timestamp, format.extension()));
    match format {
        OutputFormat::Xlsx => write_xlsx(&path, sheets)?,
        OutputFormat::Csv => write_csv_dir(&path, sheets)?,
    }
    info!(path = %path.display(), sheets = sheets.len(), "artifact written");
    Ok(path)
}

fn write_xlsx(path: &Path, sheets: &[Sheet]) -> Result<()> {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&sheet.name)
            .with_context(|| format!("invalid sheet name {}", sheet.name))?;
        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, header)?;
        }
        for (idx, row) in sheet.rows.iter().enumerate() {
            let row_num = (idx + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Empty => {}
                    Cell::Number(value) => {
                        worksheet.write_number(row_num, col as u16, *value)?;
                    }
                    Cell::Text(text) => {
                        worksheet.write_string(row_num, col as u16, text)?;
                    }
                }
            }
        }
    }
    workbook
        .save(path)
        .with_context(|| format!("failed to write workbook {}", path.display()))?;
    Ok(())
}

fn write_csv_dir(dir: &Path, sheets: &[Sheet]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create report directory {}", dir.display()))?;
    for sheet in sheets {
        let path = dir.join(format!("{}.csv", sheet.name));
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_path(&path)
            .with_context(|| format!("failed to create CSV file {}", path.display()))?;
        writer.write_record(&sheet.headers)?;
        for row in &sheet.rows {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        writer
            .flush()
            .with_context(|| format!("failed to flush CSV file {}", path.display()))?;
    }
    Ok(())
}
