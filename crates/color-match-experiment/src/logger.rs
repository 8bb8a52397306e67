//! Trial records and CSV serialization.
//!
//! Every submitted trial is appended as an immutable record, in submission
//! order. The whole log serializes to a single comma-delimited CSV export
//! written under a fixed file name.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::SessionError;

/// Fixed name of the CSV export file.
pub const EXPORT_FILE_NAME: &str = "color-logs.csv";

const CSV_HEADER: &str =
    "Group,Iteration,Left Color,Right Color,Left Background,Right Background,Operations";

/// Which slider the participant moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationKind {
    Saturation,
    Brightness,
}

impl OperationKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Saturation => "Saturation",
            Self::Brightness => "Brightness",
        }
    }
}

/// One slider adjustment made during the current trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OperationLogEntry {
    pub kind: OperationKind,
    pub value: f64,
}

/// Formats as `Kind:Value`, e.g. `Saturation:45.2` or `Brightness:60.0`.
impl fmt::Display for OperationLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:?}", self.kind.name(), self.value)
    }
}

/// The logged outcome of one submit cycle. Immutable once appended.
#[derive(Debug, Clone, Serialize)]
pub struct TrialRecord {
    /// 1-indexed group number.
    pub group: u32,
    /// 1-indexed iteration within the group.
    pub iteration: u32,
    /// Anchor swatch text, `hsb(H, S%, B%)`.
    pub left_color: String,
    /// Adjustable swatch text at submit time.
    pub right_color: String,
    pub left_background: String,
    pub right_background: String,
    /// Slider adjustments in chronological order; empty if the participant
    /// submitted without touching a slider.
    pub operations: Vec<OperationLogEntry>,
}

impl TrialRecord {
    /// The operations CSV cell: `Kind:Value` pairs joined by `", "`,
    /// empty string when no adjustments were made.
    pub fn operations_text(&self) -> String {
        self.operations
            .iter()
            .map(|op| op.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Accumulates trial records and serializes them to CSV.
#[derive(Debug, Default)]
pub struct TrialLogger {
    records: Vec<TrialRecord>,
}

impl TrialLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: TrialRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    /// Serialize the full log: one header row, then one row per record in
    /// submission order. No quoting or escaping is performed; generated
    /// values never contain literal commas. No trailing newline.
    pub fn to_csv(&self) -> String {
        let mut lines = Vec::with_capacity(self.records.len() + 1);
        lines.push(CSV_HEADER.to_string());
        for record in &self.records {
            lines.push(format!(
                "{},{},{},{},{},{},{}",
                record.group,
                record.iteration,
                record.left_color,
                record.right_color,
                record.left_background,
                record.right_background,
                record.operations_text()
            ));
        }
        lines.join("\n")
    }

    /// Write the CSV export under `dir` as [`EXPORT_FILE_NAME`]. I/O errors
    /// are surfaced to the caller; there is no retry.
    pub fn export(&self, dir: &Path) -> Result<PathBuf, SessionError> {
        let path = dir.join(EXPORT_FILE_NAME);
        fs::write(&path, self.to_csv()).map_err(|source| SessionError::Export {
            path: path.clone(),
            source,
        })?;
        info!(
            path = %path.display(),
            trials = self.records.len(),
            "trial log exported"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(group: u32, iteration: u32, operations: Vec<OperationLogEntry>) -> TrialRecord {
        TrialRecord {
            group,
            iteration,
            left_color: "hsb(60, 33.3%, 99.9%)".to_string(),
            right_color: "hsb(60, 45.2%, 60%)".to_string(),
            left_background: "hsl(240, 24.433249370277036%, 96.02999999999999%)".to_string(),
            right_background: "hsl(240, 1.5228426395939085%, 10.835%)".to_string(),
            operations,
        }
    }

    #[test]
    fn test_operation_entry_formatting() {
        let op = OperationLogEntry {
            kind: OperationKind::Saturation,
            value: 45.2,
        };
        assert_eq!(op.to_string(), "Saturation:45.2");

        let op = OperationLogEntry {
            kind: OperationKind::Brightness,
            value: 60.0,
        };
        assert_eq!(op.to_string(), "Brightness:60.0");
    }

    #[test]
    fn test_operations_text_joins_in_order() {
        let rec = record(
            1,
            1,
            vec![
                OperationLogEntry {
                    kind: OperationKind::Saturation,
                    value: 45.2,
                },
                OperationLogEntry {
                    kind: OperationKind::Brightness,
                    value: 60.0,
                },
            ],
        );
        assert_eq!(rec.operations_text(), "Saturation:45.2, Brightness:60.0");
    }

    #[test]
    fn test_operations_text_empty_without_adjustments() {
        let rec = record(1, 1, Vec::new());
        assert_eq!(rec.operations_text(), "");
    }

    #[test]
    fn test_csv_row_count_is_header_plus_records() {
        let mut logger = TrialLogger::new();
        assert_eq!(logger.to_csv().lines().count(), 1);

        for i in 1..=5 {
            logger.append(record(1, i, Vec::new()));
        }
        assert_eq!(logger.to_csv().lines().count(), 6);
    }

    #[test]
    fn test_csv_header_and_row_content() {
        let mut logger = TrialLogger::new();
        logger.append(record(
            2,
            7,
            vec![OperationLogEntry {
                kind: OperationKind::Brightness,
                value: 33.3,
            }],
        ));

        let csv = logger.to_csv();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Group,Iteration,Left Color,Right Color,Left Background,Right Background,Operations"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2,7,hsb(60, 33.3%, 99.9%),hsb(60, 45.2%, 60%),\
             hsl(240, 24.433249370277036%, 96.02999999999999%),\
             hsl(240, 1.5228426395939085%, 10.835%),Brightness:33.3"
        );
    }

    #[test]
    fn test_csv_has_no_trailing_newline() {
        let mut logger = TrialLogger::new();
        logger.append(record(1, 1, Vec::new()));
        assert!(!logger.to_csv().ends_with('\n'));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = TrialLogger::new();
        logger.append(record(1, 1, Vec::new()));

        let path = logger.export(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), logger.to_csv());
    }

    #[test]
    fn test_export_surfaces_io_errors() {
        let logger = TrialLogger::new();
        let missing = Path::new("/nonexistent-dir-for-export-test");
        let err = logger.export(missing).unwrap_err();
        assert!(matches!(err, SessionError::Export { .. }));
    }
}
