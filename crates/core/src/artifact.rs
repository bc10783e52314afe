use chrono::NaiveDateTime;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// The three kinds of workbook a run can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    NgramAnalysisOutput,
    ErrorReport,
    EmptyDatasetReport,
}

impl ArtifactKind {
    pub fn purpose(self) -> &'static str {
        match self {
            ArtifactKind::NgramAnalysisOutput => "ngram_analysis_output",
            ArtifactKind::ErrorReport => "error_report",
            ArtifactKind::EmptyDatasetReport => "empty_dataset_report",
        }
    }

    /// `{purpose}_{YYYY-MM-DD_HH-MM-SS}`, with `.{extension}` appended when
    /// `extension` is non-empty.
    pub fn file_name(self, timestamp: NaiveDateTime, extension: &str) -> String {
        let stem = format!("{}_{}", self.purpose(), timestamp.format(TIMESTAMP_FORMAT));
        if extension.is_empty() {
            stem
        } else {
            format!("{stem}.{extension}")
        }
    }
}
