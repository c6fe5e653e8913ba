mod common;

use proptest::prelude::*;
use spk_generator::source::{CellValue, RawRow};
use spk_generator::spk::{normalize, pad_customer_id, RecordDefaults};
use spk_generator::DocumentType;

#[test]
fn test_primary_column_wins_over_fallback() {
    let row = RawRow::new()
        .with("NOMOR PELANGGAN", "1")
        .with("NO PELANGGAN", "2");
    let record = normalize(&row, DocumentType::Sealing, &RecordDefaults::default());
    assert_eq!(record.customer_id, "01");
}

#[test]
fn test_removal_primary_column_wins() {
    let row = RawRow::new().with("NO PELANGGAN", "7").with("NO SAMB", "8");
    let record = normalize(&row, DocumentType::Removal, &RecordDefaults::default());
    assert_eq!(record.customer_id, "08");
}

#[test]
fn test_non_numeric_id_passes_through() {
    assert_eq!(pad_customer_id("AB-123"), "AB-123");
    assert_eq!(pad_customer_id(" 12 34 "), "12 34");
}

#[test]
fn test_missing_branch_and_manager_use_defaults() {
    let row = common::sealing_row("5", "Budi");
    let record = normalize(&row, DocumentType::Sealing, &RecordDefaults::default());
    assert_eq!(record.branch, "Kotabaru");
    assert_eq!(record.manager_name, "Endang Komara");
}

#[test]
fn test_spreadsheet_numbers_render_as_plain_text() {
    let row = RawRow::new()
        .with("NOMOR PELANGGAN", CellValue::Float(31234.0))
        .with("JUMLAH BLN", CellValue::Float(3.0))
        .with("TOTAL REK", CellValue::Float(150000.0));
    let record = normalize(&row, DocumentType::Sealing, &RecordDefaults::default());
    assert_eq!(record.customer_id, "031234");
    assert_eq!(record.arrears_months, "3");
    assert_eq!(record.arrears_amount, "150000");
}

fn cell_strategy() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Empty),
        Just(CellValue::Float(f64::NAN)),
        any::<i64>().prop_map(CellValue::Int),
        "[ 0-9a-z-]{0,12}".prop_map(|s| CellValue::from(s.as_str())),
        any::<bool>().prop_map(CellValue::Bool),
    ]
}

proptest! {
    #[test]
    fn prop_padding_is_idempotent(raw in "[ 0-9A-Z-]{0,12}") {
        let once = pad_customer_id(&raw);
        prop_assert_eq!(pad_customer_id(&once), once.clone());
        prop_assert!(!once.starts_with("00") || raw.trim().starts_with("00"));
    }

    #[test]
    fn prop_normalize_never_leaks_missing_values(
        id in cell_strategy(),
        name in cell_strategy(),
        months in cell_strategy(),
        amount in cell_strategy(),
        sealing in any::<bool>(),
    ) {
        let doc_type = if sealing { DocumentType::Sealing } else { DocumentType::Removal };
        let row = RawRow::new()
            .with("NOMOR PELANGGAN", id.clone())
            .with("NO SAMB", id)
            .with("NAMA", name)
            .with("JUMLAH BLN", months.clone())
            .with("TOTAL TUNGGAKAN", months)
            .with("TOTAL TAGIHAN", amount);
        let record = normalize(&row, doc_type, &RecordDefaults::default());

        for field in [&record.customer_id, &record.name, &record.arrears_months, &record.arrears_amount] {
            prop_assert!(!field.contains("NaN"));
        }
        prop_assert!(!record.branch.is_empty());
        prop_assert!(!record.manager_name.is_empty());
    }
}
