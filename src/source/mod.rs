//! Row sources - spreadsheet and delimited-text readers.
//!
//! Every reader yields the same shape: named sheets of ordered, string-keyed
//! rows. The normalizer only depends on [`RawRow`] and [`CellValue`], never on
//! a concrete reader.
//! - `csv` - flat delimited-text batches (one sheet)
//! - `xlsx` - workbooks (one sheet per worksheet)

pub mod csv;
pub mod xlsx;

pub use self::csv::CsvRowSource;
pub use self::xlsx::XlsxRowSource;

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Errors raised while opening or parsing an input file.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open input file: {0}")]
    Io(#[source] std::io::Error),
    #[error("failed to parse delimited text: {0}")]
    Csv(#[source] ::csv::Error),
    #[error("failed to read workbook {context}: {source}")]
    Workbook {
        context: String,
        #[source]
        source: calamine::Error,
    },
    #[error("unsupported input file '{0}' (expected .csv, .xlsx or .xls)")]
    Unsupported(String),
}

/// A single spreadsheet cell as handed over by a reader.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    /// True for cells a spreadsheet would report as blank or NaN.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Float(value) => value.is_nan(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) if value.is_nan() => Ok(()),
            // Workbooks store integer columns as floats.
            Self::Float(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{}", if *value { "True" } else { "False" }),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

/// One input row: column names paired with cell values, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.push((column.into(), value.into()));
    }

    /// Builder-style variant of [`RawRow::push`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.push(column, value);
        self
    }

    /// Look up a column by name, ignoring case and surrounding whitespace.
    ///
    /// When two columns collapse onto the same key, the later one wins.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        let wanted = column.trim().to_uppercase();
        self.cells
            .iter()
            .rev()
            .find(|(name, _)| name.trim().to_uppercase() == wanted)
            .map(|(_, value)| value)
    }
}

/// A named batch of rows (a workbook sheet or a whole CSV file).
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<RawRow>,
}

/// Capability to produce sheets of raw rows.
pub trait RowSource {
    fn sheets(&mut self) -> Result<Vec<Sheet>, SourceError>;
}

/// Input formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Xlsx,
    Xls,
    Unknown,
}

impl SourceKind {
    /// Parse from extension string.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "csv" => Self::Csv,
            "xlsx" => Self::Xlsx,
            "xls" => Self::Xls,
            _ => Self::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }
}

/// Open the right reader for `path` based on its extension.
pub fn open_source(path: &Path) -> Result<Box<dyn RowSource>, SourceError> {
    match SourceKind::from_path(path) {
        SourceKind::Csv => Ok(Box::new(CsvRowSource::new(path))),
        SourceKind::Xlsx | SourceKind::Xls => Ok(Box::new(XlsxRowSource::new(path))),
        SourceKind::Unknown => Err(SourceError::Unsupported(path.display().to_string())),
    }
}
