//! Delimited-text reader.

use std::path::{Path, PathBuf};

use super::{CellValue, RawRow, RowSource, Sheet, SourceError};

/// Reads a headed CSV file as a single sheet.
pub struct CsvRowSource {
    path: PathBuf,
    batch_name: Option<String>,
}

impl CsvRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            batch_name: None,
        }
    }

    /// Name the produced sheet explicitly instead of using the file stem.
    pub fn with_batch_name(mut self, name: impl Into<String>) -> Self {
        self.batch_name = Some(name.into());
        self
    }

    fn sheet_name(&self) -> String {
        self.batch_name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("CSV")
                .to_string()
        })
    }
}

impl RowSource for CsvRowSource {
    fn sheets(&mut self) -> Result<Vec<Sheet>, SourceError> {
        let rows = read_rows(&self.path)?;
        log::debug!("Read {} rows from {}", rows.len(), self.path.display());
        Ok(vec![Sheet {
            name: self.sheet_name(),
            rows,
        }])
    }
}

/// Read every data row of a headed CSV file.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, SourceError> {
    let file = std::fs::File::open(path).map_err(SourceError::Io)?;
    read_rows_from(file)
}

/// Same as [`read_rows`] for any reader.
pub fn read_rows_from<R: std::io::Read>(reader: R) -> Result<Vec<RawRow>, SourceError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(::csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers().map_err(SourceError::Csv)?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(SourceError::Csv)?;
        let mut row = RawRow::new();
        for (index, header) in headers.iter().enumerate() {
            let value = record.get(index).map(CellValue::from).unwrap_or(CellValue::Empty);
            row.push(header, value);
        }
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_headed_rows_in_order() {
        let data = "NOMOR PELANGGAN,NAMA,JUMLAH BLN\n12345,Budi,3\n,Ani,\n";
        let rows = read_rows_from(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("nama"), Some(&CellValue::Text("Budi".into())));
        assert_eq!(rows[1].get("NOMOR PELANGGAN"), Some(&CellValue::Empty));
        assert_eq!(rows[1].get("JUMLAH BLN"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_short_rows_fill_missing_cells() {
        let data = "NO SAMB,NAMA,CABANG\n777\n";
        let rows = read_rows_from(data.as_bytes()).unwrap();

        assert_eq!(rows[0].get("NO SAMB"), Some(&CellValue::Text("777".into())));
        assert_eq!(rows[0].get("CABANG"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_sheet_named_after_file_stem() {
        let source = CsvRowSource::new("/tmp/data_pelanggan.csv");
        assert_eq!(source.sheet_name(), "data_pelanggan");

        let named = CsvRowSource::new("/tmp/data.csv").with_batch_name("PENYEGELAN");
        assert_eq!(named.sheet_name(), "PENYEGELAN");
    }
}
