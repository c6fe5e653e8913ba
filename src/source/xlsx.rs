//! Workbook reader backed by `calamine`.

use std::path::PathBuf;

use calamine::{open_workbook_auto, Data, Reader};

use super::{CellValue, RawRow, RowSource, Sheet, SourceError};

/// Reads every worksheet of an `.xlsx`/`.xls` workbook, first row as header.
pub struct XlsxRowSource {
    path: PathBuf,
}

impl XlsxRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSource for XlsxRowSource {
    fn sheets(&mut self) -> Result<Vec<Sheet>, SourceError> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|source| SourceError::Workbook {
            context: self.path.display().to_string(),
            source,
        })?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|source| SourceError::Workbook {
                    context: format!("{} (sheet '{name}')", self.path.display()),
                    source,
                })?;

            let mut rows_iter = range.rows();
            let headers: Vec<String> = match rows_iter.next() {
                Some(header_row) => header_row
                    .iter()
                    .enumerate()
                    .map(|(index, cell)| header_name(index, cell))
                    .collect(),
                None => Vec::new(),
            };

            let rows: Vec<RawRow> = rows_iter
                .filter(|cells| cells.iter().any(|cell| !matches!(cell, Data::Empty)))
                .map(|cells| {
                    let mut row = RawRow::new();
                    for (index, header) in headers.iter().enumerate() {
                        let value = cells.get(index).map(to_cell_value).unwrap_or(CellValue::Empty);
                        row.push(header.clone(), value);
                    }
                    row
                })
                .collect();

            log::debug!("Sheet '{}': {} rows", name, rows.len());
            sheets.push(Sheet { name, rows });
        }

        Ok(sheets)
    }
}

fn header_name(index: usize, cell: &Data) -> String {
    let name = cell.to_string().trim().to_string();
    if name.is_empty() {
        format!("Unnamed: {index}")
    } else {
        name
    }
}

fn to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(text) => CellValue::from(text.as_str()),
        Data::Int(value) => CellValue::Int(*value),
        Data::Float(value) => CellValue::Float(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_header_gets_positional_name() {
        assert_eq!(header_name(3, &Data::Empty), "Unnamed: 3");
        assert_eq!(header_name(0, &Data::String(" NAMA ".into())), "NAMA");
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(to_cell_value(&Data::Float(5.0)), CellValue::Float(5.0));
        assert_eq!(to_cell_value(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(to_cell_value(&Data::Int(7)), CellValue::Int(7));
    }

    #[test]
    fn test_missing_workbook_is_a_read_failure() {
        let mut source = XlsxRowSource::new("/nonexistent/dir/book.xlsx");
        let err = source.sheets().unwrap_err();
        assert!(matches!(err, SourceError::Workbook { .. }));
        assert!(err.to_string().contains("/nonexistent/dir/book.xlsx"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
