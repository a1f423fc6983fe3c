//! Bulk word import from Excel and CSV files

use calamine::{open_workbook, Data, Reader, Xlsx, XlsxError};
use csv::{ByteRecord, ReaderBuilder};
use std::path::Path;

use crate::db::Store;
use crate::error::{ImportError, ImportRowError, SkipReason};
use crate::models::{Level, NewWord};

/// Outcome of an import: how many words landed and which rows were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: usize,
    pub skipped: Vec<ImportRowError>,
}

impl ImportReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Import an `.xlsx` or `.csv` file. Rows without a level column go to `default_level`.
pub fn import_file(store: &Store, file_path: &Path, default_level: Level) -> Result<ImportReport, ImportError> {
    let extension = file_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "xlsx" => read_xlsx_rows(file_path)?,
        "csv" => read_csv_rows(file_path)?,
        _ => return Err(ImportError::UnsupportedFormat(extension)),
    };
    import_raw_rows(store, rows, default_level)
}

/// Validate already-split rows and insert the good ones in a single transaction
pub fn import_rows(
    store: &Store,
    rows: impl IntoIterator<Item = Vec<String>>,
    default_level: Level,
) -> Result<ImportReport, ImportError> {
    import_raw_rows(store, rows.into_iter().map(Ok), default_level)
}

/// A row as read from the file. Rows that could not be decoded carry their skip reason.
type RawRow = Result<Vec<String>, SkipReason>;

fn import_raw_rows(
    store: &Store,
    rows: impl IntoIterator<Item = RawRow>,
    default_level: Level,
) -> Result<ImportReport, ImportError> {
    let mut words = Vec::new();
    let mut skipped = Vec::new();

    for (i, raw) in rows.into_iter().enumerate() {
        let row = i + 1;
        let outcome = match raw {
            Ok(cells) => parse_row(&cells, default_level),
            Err(reason) => RowOutcome::Skipped(reason),
        };
        match outcome {
            RowOutcome::Word(word) => words.push(word),
            RowOutcome::Ignored => {}
            RowOutcome::Skipped(reason) => {
                tracing::warn!(row, %reason, "skipping import row");
                skipped.push(ImportRowError { row, reason });
            }
        }
    }

    let inserted = store.insert_words(&words)?;
    tracing::info!(inserted, skipped = skipped.len(), "word import finished");
    Ok(ImportReport { inserted, skipped })
}

#[derive(Debug, PartialEq, Eq)]
enum RowOutcome {
    Word(NewWord),
    /// Header or fully blank row
    Ignored,
    Skipped(SkipReason),
}

/// Two cells are `source, target`; three or more are `level, source, target, ...`.
fn parse_row(cells: &[String], default_level: Level) -> RowOutcome {
    let cells: Vec<&str> = cells.iter().map(|c| c.trim()).collect();
    if cells.iter().all(|c| c.is_empty()) || is_header(&cells) {
        return RowOutcome::Ignored;
    }

    let (level, source, target) = match cells.as_slice() {
        [source, target] => (default_level, *source, *target),
        [level_cell, source, target, ..] => {
            let level = if level_cell.is_empty() {
                default_level
            } else {
                match parse_level(level_cell) {
                    Some(level) => level,
                    None => return RowOutcome::Skipped(SkipReason::InvalidLevel(level_cell.to_string())),
                }
            };
            (level, *source, *target)
        }
        _ => return RowOutcome::Skipped(SkipReason::MissingColumns),
    };

    if source.is_empty() {
        return RowOutcome::Skipped(SkipReason::EmptySource);
    }
    if target.is_empty() {
        return RowOutcome::Skipped(SkipReason::EmptyTarget);
    }
    RowOutcome::Word(NewWord::new(level, source, target))
}

/// Looks at the first word of the first cell only, so "Word (English)" is a header
/// but "password" or "swordfish" still import
fn is_header(cells: &[&str]) -> bool {
    let first = cells.first().map(|c| c.to_lowercase()).unwrap_or_default();
    let token = first
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .find(|t| !t.is_empty())
        .unwrap_or_default();
    matches!(token, "word" | "words" | "level" | "english")
}

fn parse_level(raw: &str) -> Option<Level> {
    let value = raw
        .parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i64))?;
    Level::new(value).ok()
}

fn read_xlsx_rows(file_path: &Path) -> Result<Vec<RawRow>, ImportError> {
    let mut workbook: Xlsx<_> =
        open_workbook(file_path).map_err(|e: XlsxError| ImportError::Open(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .ok_or(ImportError::NoSheets)?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::Read(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| Ok(row.iter().map(get_cell_string).collect()))
        .collect())
}

/// Reads raw bytes so one badly encoded line is skipped instead of failing the file
fn read_csv_rows(file_path: &Path) -> Result<Vec<RawRow>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(file_path)
        .map_err(|e| ImportError::Open(e.to_string()))?;

    reader
        .byte_records()
        .map(|record| -> Result<RawRow, ImportError> {
            let record = record.map_err(|e| ImportError::Read(e.to_string()))?;
            Ok(decode_record(&record))
        })
        .collect()
}

fn decode_record(record: &ByteRecord) -> RawRow {
    record
        .iter()
        .map(|field| {
            std::str::from_utf8(field)
                .map(|s| s.to_string())
                .map_err(|_| SkipReason::InvalidEncoding)
        })
        .collect()
}

/// Helper to extract string from Excel cell
fn get_cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}
