//! CSV input and output for query batches.
//!
//! Input is any CSV with a header row. Queries come from the column labeled
//! `"A"` when one exists, otherwise from the first column. Output always has
//! the header `Search,Link` followed by one row per [`ResolutionRecord`].

mod error;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::batch::ResolutionRecord;

pub use error::TableError;

/// Header label preferred for the query column.
pub const PREFERRED_COLUMN: &str = "A";

/// Header of the output file.
pub const OUTPUT_HEADER: [&str; 2] = ["Search", "Link"];

/// Suffix appended to the input file stem for the default output name.
pub const OUTPUT_SUFFIX: &str = "-links.csv";

/// Which input column the queries were read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryColumn {
    /// The column labeled [`PREFERRED_COLUMN`].
    Preferred,
    /// The first column, carrying this header label.
    First(String),
}

impl std::fmt::Display for QueryColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preferred => write!(f, "column '{PREFERRED_COLUMN}'"),
            Self::First(label) if label.is_empty() => write!(f, "first column"),
            Self::First(label) => write!(f, "first column '{label}'"),
        }
    }
}

/// Queries read from an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySheet {
    /// Column the queries came from.
    pub column: QueryColumn,
    /// Non-blank queries in file order.
    pub queries: Vec<String>,
}

/// Reads queries from the CSV file at `path`.
///
/// Cells are trimmed; blank cells and rows too short to reach the column are
/// skipped. Rows may have differing lengths.
///
/// # Errors
///
/// Returns [`TableError::Open`] if the file cannot be opened,
/// [`TableError::Read`] for a malformed row, and [`TableError::NoColumns`]
/// if the header row is empty.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_queries(path: &Path) -> Result<QuerySheet, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)
        .map_err(|e| TableError::open(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| TableError::read(path, 1, e))?
        .clone();
    if headers.is_empty() {
        return Err(TableError::no_columns(path));
    }

    let (index, column) = match headers
        .iter()
        .position(|label| label.trim() == PREFERRED_COLUMN)
    {
        Some(index) => (index, QueryColumn::Preferred),
        None => (
            0,
            QueryColumn::First(headers.get(0).unwrap_or_default().trim().to_string()),
        ),
    };
    debug!(index, %column, "Selected query column");

    let mut queries = Vec::new();
    for (row, record) in (2_u64..).zip(reader.records()) {
        let record = record.map_err(|e| TableError::read(path, row, e))?;
        match record.get(index).map(str::trim) {
            Some(cell) if !cell.is_empty() => queries.push(cell.to_string()),
            _ => {}
        }
    }

    info!(count = queries.len(), %column, "Loaded queries");
    Ok(QuerySheet { column, queries })
}

/// Writes `records` to `path` as CSV with a `Search,Link` header.
///
/// The header is written even when `records` is empty. An existing file is
/// replaced.
///
/// # Errors
///
/// Returns [`TableError::Write`] if the file cannot be created or written.
#[tracing::instrument(skip_all, fields(path = %path.display(), count = records.len()))]
pub fn write_records(path: &Path, records: &[ResolutionRecord]) -> Result<(), TableError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| TableError::write(path, e))?;

    writer
        .write_record(OUTPUT_HEADER)
        .map_err(|e| TableError::write(path, e))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| TableError::write(path, e))?;
    }
    writer
        .flush()
        .map_err(|e| TableError::write(path, csv::Error::from(e)))?;

    debug!("Wrote output file");
    Ok(())
}

/// Default output path for `input`: `<stem>-links.csv` in `output_dir`, or
/// next to the input when no directory is given.
#[must_use]
pub fn default_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "queries".into(), |stem| stem.to_string_lossy());
    let file_name = format!("{stem}{OUTPUT_SUFFIX}");
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write_input(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("input.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    // ==================== Load Tests ====================

    #[test]
    fn test_load_prefers_column_a() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "id,A\n1,iphone 15\n2,galaxy s24\n");

        let sheet = load_queries(&path).unwrap();
        assert_eq!(sheet.column, QueryColumn::Preferred);
        assert_eq!(sheet.queries, ["iphone 15", "galaxy s24"]);
    }

    #[test]
    fn test_load_falls_back_to_first_column() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "Product,Note\nairpods pro,x\nkindle,y\n");

        let sheet = load_queries(&path).unwrap();
        assert_eq!(sheet.column, QueryColumn::First("Product".to_string()));
        assert_eq!(sheet.queries, ["airpods pro", "kindle"]);
    }

    #[test]
    fn test_load_skips_blank_and_short_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "x,A\n1,first\n2,\n3\n4,  \n5,  last  \n");

        let sheet = load_queries(&path).unwrap();
        assert_eq!(sheet.queries, ["first", "last"]);
    }

    #[test]
    fn test_load_header_only_yields_no_queries() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "A\n");

        let sheet = load_queries(&path).unwrap();
        assert!(sheet.queries.is_empty());
    }

    #[test]
    fn test_load_empty_file_has_no_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "");

        let err = load_queries(&path).unwrap_err();
        assert!(matches!(err, TableError::NoColumns { .. }), "{err:?}");
    }

    #[test]
    fn test_load_missing_file_is_open_error() {
        let dir = TempDir::new().unwrap();
        let err = load_queries(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, TableError::Open { .. }), "{err:?}");
    }

    #[test]
    fn test_load_keeps_quoted_commas() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "A\n\"monitor 27\"\", 144hz\"\n");

        let sheet = load_queries(&path).unwrap();
        assert_eq!(sheet.queries, ["monitor 27\", 144hz"]);
    }

    // ==================== Write Tests ====================

    #[test]
    fn test_write_records_with_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let records = vec![
            ResolutionRecord::new("iphone 15", "https://www.akakce.com/iphone"),
            ResolutionRecord::new("unknown", ""),
        ];

        write_records(&path, &records).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "Search,Link\niphone 15,https://www.akakce.com/iphone\nunknown,\n"
        );
    }

    #[test]
    fn test_write_empty_records_writes_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        write_records(&path, &[]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Search,Link\n");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = write_records(&path, &[]).unwrap_err();
        assert!(matches!(err, TableError::Write { .. }), "{err:?}");
    }

    // ==================== Output Path Tests ====================

    #[test]
    fn test_default_output_path_next_to_input() {
        let path = default_output_path(Path::new("/data/products.csv"), None);
        assert_eq!(path, PathBuf::from("/data/products-links.csv"));
    }

    #[test]
    fn test_default_output_path_in_output_dir() {
        let path = default_output_path(Path::new("/data/products.csv"), Some(Path::new("/out")));
        assert_eq!(path, PathBuf::from("/out/products-links.csv"));
    }

    #[test]
    fn test_query_column_display() {
        assert_eq!(QueryColumn::Preferred.to_string(), "column 'A'");
        assert_eq!(
            QueryColumn::First("Product".to_string()).to_string(),
            "first column 'Product'"
        );
    }
}
