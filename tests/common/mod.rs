//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::path::Path;

use spk_generator::source::{CellValue, RawRow, Sheet};
use spk_generator::spk::LayoutOptions;
use spk_generator::surface::recording::LayoutDump;
use spk_generator::surface::RecordingFactory;
use spk_generator::{CustomerRecord, SpkGenerator};

pub fn record(id: &str, name: &str) -> CustomerRecord {
    CustomerRecord {
        customer_id: id.to_string(),
        name: name.to_string(),
        arrears_months: "2".to_string(),
        arrears_amount: "98.500".to_string(),
        branch: "Kotabaru".to_string(),
        manager_name: "Endang Komara".to_string(),
    }
}

pub fn sealing_row(id: &str, name: &str) -> RawRow {
    RawRow::new()
        .with("NOMOR PELANGGAN", id)
        .with("NAMA", name)
        .with("JUMLAH BLN", CellValue::Int(3))
        .with("TOTAL REK", CellValue::Int(150000))
}

pub fn removal_row(id: &str, name: &str) -> RawRow {
    RawRow::new()
        .with("NO SAMB", id)
        .with("NAMA", name)
        .with("TOTAL TUNGGAKAN", CellValue::Int(6))
        .with("JUMLAH TUNGGAKAN (Rp)", CellValue::Int(420000))
}

pub fn sheet(name: &str, rows: Vec<RawRow>) -> Sheet {
    Sheet {
        name: name.to_string(),
        rows,
    }
}

/// Generator writing JSON layout dumps into `dir`.
pub fn json_generator(dir: &Path) -> SpkGenerator {
    SpkGenerator::new(Box::new(RecordingFactory), dir).with_options(LayoutOptions { year: 2026 })
}

pub fn read_dump(path: &Path) -> LayoutDump {
    let bytes = std::fs::read(path).expect("layout dump should exist");
    serde_json::from_slice(&bytes).expect("layout dump should be valid JSON")
}
