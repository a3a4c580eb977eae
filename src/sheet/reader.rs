//! Spreadsheet reader implementation - Excel (.xlsx) → in-memory table

use crate::error::{ReservoirError, ReservoirResult};
use crate::types::FieldValue;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::{DateTime, NaiveDate, Utc};
use std::path::{Path, PathBuf};

/// An in-memory table read from a spreadsheet: named columns plus rows of
/// typed cell values, one value per column per row.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<FieldValue>>,
}

impl SheetTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Spreadsheet reader for turning the first worksheet of an .xlsx file
/// into a [`SheetTable`].
pub struct SheetReader {
    path: PathBuf,
}

impl SheetReader {
    /// Create a new sheet reader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read the first worksheet. Any open or parse failure is a load
    /// error; no rows are produced on failure.
    pub fn read(&self) -> ReservoirResult<SheetTable> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path).map_err(|e| {
            ReservoirError::Load(format!("failed to open {}: {e}", self.path.display()))
        })?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ReservoirError::Load("workbook has no sheets".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            ReservoirError::Load(format!("failed to read sheet '{sheet_name}': {e}"))
        })?;

        let table = Self::parse_range(&range)?;
        tracing::debug!(
            sheet = %sheet_name,
            rows = table.row_count(),
            columns = table.columns.len(),
            "read spreadsheet"
        );
        Ok(table)
    }

    /// Parse a worksheet range: row 0 is the header, the rest are data.
    fn parse_range(range: &Range<Data>) -> ReservoirResult<SheetTable> {
        let (height, width) = range.get_size();
        if height == 0 || width == 0 {
            return Err(ReservoirError::Load("sheet has no header row".to_string()));
        }

        let columns: Vec<String> = (0..width)
            .map(|col| match range.get((0, col)) {
                Some(cell) => Self::header_name(cell, col),
                None => format!("col_{col}"),
            })
            .collect();

        let rows: Vec<Vec<FieldValue>> = (1..height)
            .map(|row| {
                (0..width)
                    .map(|col| {
                        range
                            .get((row, col))
                            .map(Self::cell_value)
                            .unwrap_or(FieldValue::Null)
                    })
                    .collect()
            })
            .collect();

        Ok(SheetTable { columns, rows })
    }

    /// Header cells are usually text; numeric headers are stringified and
    /// anything else falls back to a positional name.
    fn header_name(cell: &Data, col: usize) -> String {
        match cell {
            Data::String(s) if !s.trim().is_empty() => s.clone(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => f.to_string(),
            _ => format!("col_{col}"),
        }
    }

    /// Convert one cell into a typed field value. Empty cells map to an
    /// explicit null; date-formatted cells keep their date type.
    fn cell_value(cell: &Data) -> FieldValue {
        match cell {
            Data::Empty => FieldValue::Null,
            Data::String(s) => FieldValue::Text(s.clone()),
            Data::Float(f) => FieldValue::Number(*f),
            Data::Int(i) => FieldValue::Number(*i as f64),
            Data::Bool(b) => FieldValue::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(naive) => FieldValue::DateTime(naive.and_utc()),
                None => FieldValue::Null,
            },
            Data::DateTimeIso(s) => Self::parse_iso_datetime(s),
            Data::DurationIso(s) => FieldValue::Text(s.clone()),
            Data::Error(e) => {
                tracing::warn!(error = ?e, "cell error treated as null");
                FieldValue::Null
            }
        }
    }

    fn parse_iso_datetime(raw: &str) -> FieldValue {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return FieldValue::DateTime(dt.with_timezone(&Utc));
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return FieldValue::DateTime(date.and_hms_opt(0, 0, 0).unwrap().and_utc());
        }
        FieldValue::Text(raw.to_string())
    }
}
