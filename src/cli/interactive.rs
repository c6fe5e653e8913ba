//! Interactive menu.
//!
//! Reads commands line by line so it can be driven by any `BufRead`; end of
//! input behaves like choosing quit.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, ContentArrangement, Table};

use crate::config::SpkConfig;
use crate::source::csv::read_rows;
use crate::source::open_source;
use crate::spk::normalizer::normalize_all;
use crate::spk::{CustomerRecord, DocumentType, GenerationReport, SpkGenerator};

use super::print_report;

const LIST_LIMIT: usize = 20;

pub struct Session<'a> {
    config: &'a SpkConfig,
    generator: &'a SpkGenerator,
    records: Vec<CustomerRecord>,
}

impl<'a> Session<'a> {
    /// Start a session, pre-loading the configured CSV batch if it exists.
    pub fn new(config: &'a SpkConfig, generator: &'a SpkGenerator) -> Self {
        let records = load_csv_records(&config.csv_file, generator);
        Self::with_records(config, generator, records)
    }

    pub fn with_records(
        config: &'a SpkConfig,
        generator: &'a SpkGenerator,
        records: Vec<CustomerRecord>,
    ) -> Self {
        Self {
            config,
            generator,
            records,
        }
    }

    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut out: W) -> io::Result<()> {
        loop {
            self.print_menu(&mut out)?;
            let Some(choice) = prompt(&mut input, &mut out, "Pilih menu › ")? else {
                writeln!(out, "\nKeluar...")?;
                break;
            };

            match choice.to_lowercase().as_str() {
                "1" => self.list_records(&mut out)?,
                "2" => {
                    writeln!(out, "\nCETAK LAPORAN DARI EXCEL")?;
                    writeln!(out, "Ketik path file Excel (drag & drop juga bisa)")?;
                    writeln!(out, "Default: {}", self.config.default_workbook.display())?;
                    let Some(answer) = prompt(&mut input, &mut out, "File › ")? else {
                        writeln!(out, "\nKeluar...")?;
                        break;
                    };
                    let path = self.workbook_path(&answer);
                    self.generate_from_workbook(&path, &mut out)?;
                }
                "3" => self.generate_from_csv(&mut out)?,
                "q" => {
                    writeln!(out, "Terima kasih telah menggunakan SPK Generator!")?;
                    break;
                }
                other => writeln!(out, "Pilihan tidak dikenal: {other}")?,
            }

            if prompt(&mut input, &mut out, "\nTekan Enter untuk kembali...")?.is_none() {
                writeln!(out)?;
                break;
            }
        }
        Ok(())
    }

    fn print_menu<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let output_status = if self.generator.output_dir().exists() {
            "ada"
        } else {
            "belum ada"
        };
        writeln!(out, "\nSPK GENERATOR")?;
        writeln!(
            out,
            "  CSV Data: {} records | Output Dir: {} ({})",
            self.records.len(),
            self.generator.output_dir().display(),
            output_status
        )?;
        writeln!(out, "\nMENU UTAMA")?;
        writeln!(out, "  [1] Lihat Daftar Pelanggan (CSV)")?;
        writeln!(out, "  [2] Cetak Laporan dari Excel")?;
        writeln!(out, "  [3] Cetak Laporan dari CSV")?;
        writeln!(out, "  [q] Keluar")
    }

    fn list_records<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\nDAFTAR PELANGGAN\n")?;
        if self.records.is_empty() {
            return writeln!(out, "Data CSV kosong atau tidak ditemukan");
        }
        writeln!(out, "{}", records_table(&self.records))?;
        if self.records.len() > LIST_LIMIT {
            writeln!(out, "... dan {} data lainnya", self.records.len() - LIST_LIMIT)?;
        }
        Ok(())
    }

    fn workbook_path(&self, answer: &str) -> PathBuf {
        let cleaned = answer.trim().trim_matches(|c| c == '\'' || c == '"');
        if cleaned.is_empty() {
            self.config.default_workbook.clone()
        } else {
            PathBuf::from(cleaned)
        }
    }

    fn generate_from_workbook<W: Write>(&self, path: &Path, out: &mut W) -> io::Result<()> {
        if !path.exists() {
            return writeln!(out, "File tidak ditemukan: {}", path.display());
        }
        writeln!(out, "Membaca file: {}...", display_name(path))?;

        let mut source = match open_source(path) {
            Ok(source) => source,
            Err(e) => return writeln!(out, "Gagal membaca data Excel: {e}"),
        };
        match self.generator.generate_from_source(&mut *source) {
            Ok(report) => self.print_summary(&report, out),
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                writeln!(out, "Gagal membaca data Excel: {e}")?;
                writeln!(
                    out,
                    "Tips: Jika error berlanjut, buka file Excel tersebut, lalu 'Save As' dengan nama baru."
                )
            }
        }
    }

    fn generate_from_csv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\nCETAK LAPORAN DARI CSV\n")?;
        if self.records.is_empty() {
            return writeln!(out, "Data CSV kosong atau tidak ditemukan");
        }
        writeln!(out, "Generating PDF...")?;
        let report = GenerationReport {
            batches: vec![self.generator.generate_csv_batch(&self.records)],
        };
        self.print_summary(&report, out)
    }

    fn print_summary<W: Write>(&self, report: &GenerationReport, out: &mut W) -> io::Result<()> {
        print_report(report, out)?;
        let files = report.generated_files().len();
        if files > 0 {
            writeln!(out, "Berhasil generate {files} file!")?;
            writeln!(out, "Lokasi: {}", self.generator.output_dir().display())?;
        }
        Ok(())
    }
}

/// Print `label`, read one line. `None` on end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> io::Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn records_table(records: &[CustomerRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("No Pelanggan"), Cell::new("Nama")]);
    for record in records.iter().take(LIST_LIMIT) {
        table.add_row(vec![
            Cell::new(or_dash(&record.customer_id)),
            Cell::new(or_dash(&record.name)),
        ]);
    }
    table
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// The pre-loaded CSV batch, normalized as a sealing batch. Missing or
/// unreadable files yield an empty list.
pub fn load_csv_records(path: &Path, generator: &SpkGenerator) -> Vec<CustomerRecord> {
    if !path.exists() {
        log::debug!("No CSV batch at {}", path.display());
        return Vec::new();
    }
    match read_rows(path) {
        Ok(rows) => normalize_all(&rows, DocumentType::Sealing, generator.defaults()),
        Err(e) => {
            log::warn!("Could not read {}: {}", path.display(), e);
            Vec::new()
        }
    }
}
