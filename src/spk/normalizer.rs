//! Row normalization.
//!
//! Maps loosely named spreadsheet columns onto [`CustomerRecord`]. Each field
//! has a per-type list of candidate column names tried in priority order;
//! nothing here ever fails, bad cells simply become empty strings.

use crate::source::{CellValue, RawRow};

use super::model::{CustomerRecord, DocumentType};

pub const DEFAULT_BRANCH: &str = "Kotabaru";
pub const DEFAULT_MANAGER: &str = "Endang Komara";

/// Fallback values for columns that most sheets leave out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDefaults {
    pub branch: String,
    pub manager_name: String,
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            branch: DEFAULT_BRANCH.to_string(),
            manager_name: DEFAULT_MANAGER.to_string(),
        }
    }
}

/// Candidate column names for each canonical field.
///
/// Each list ends with the snake_case key of an already-normalized CSV batch
/// (`no_pelanggan`, `total_tunggakan_bulan`, ...). Lookup ignores case.
struct ColumnAliases {
    customer_id: &'static [&'static str],
    name: &'static [&'static str],
    arrears_months: &'static [&'static str],
    arrears_amount: &'static [&'static str],
}

const SEALING_ALIASES: ColumnAliases = ColumnAliases {
    customer_id: &["NOMOR PELANGGAN", "NO PELANGGAN", "NO_PELANGGAN"],
    name: &["NAMA"],
    arrears_months: &["JUMLAH BLN", "JUMLAH BULAN", "TOTAL_TUNGGAKAN_BULAN"],
    arrears_amount: &["TOTAL REK", "TOTAL TAGIHAN", "TOTAL_TAGIHAN"],
};

const REMOVAL_ALIASES: ColumnAliases = ColumnAliases {
    customer_id: &["NO SAMB", "NO PELANGGAN", "NO_PELANGGAN"],
    name: &["NAMA"],
    arrears_months: &["TOTAL TUNGGAKAN", "TOTAL_TUNGGAKAN_BULAN"],
    arrears_amount: &["JUMLAH TUNGGAKAN (RP)", "TOTAL TAGIHAN", "TOTAL_TAGIHAN"],
};

const BRANCH_COLUMNS: &[&str] = &["CABANG"];
const MANAGER_COLUMNS: &[&str] = &["MANAGER", "MANAGER_NAME"];

fn aliases_for(doc_type: DocumentType) -> &'static ColumnAliases {
    match doc_type {
        DocumentType::Sealing => &SEALING_ALIASES,
        DocumentType::Removal => &REMOVAL_ALIASES,
    }
}

/// Normalize one raw row into a canonical record.
pub fn normalize(row: &RawRow, doc_type: DocumentType, defaults: &RecordDefaults) -> CustomerRecord {
    let aliases = aliases_for(doc_type);

    let customer_id = resolve(row, aliases.customer_id)
        .map(format_customer_id)
        .unwrap_or_default();

    CustomerRecord {
        customer_id,
        name: resolve_text(row, aliases.name),
        arrears_months: resolve_text(row, aliases.arrears_months),
        arrears_amount: resolve_text(row, aliases.arrears_amount),
        branch: resolve(row, BRANCH_COLUMNS)
            .map(ToString::to_string)
            .unwrap_or_else(|| defaults.branch.clone()),
        manager_name: resolve(row, MANAGER_COLUMNS)
            .map(ToString::to_string)
            .unwrap_or_else(|| defaults.manager_name.clone()),
    }
}

/// Normalize a whole batch, preserving row order.
pub fn normalize_all(
    rows: &[RawRow],
    doc_type: DocumentType,
    defaults: &RecordDefaults,
) -> Vec<CustomerRecord> {
    rows.iter()
        .map(|row| normalize(row, doc_type, defaults))
        .collect()
}

/// First candidate column that is present and not blank.
fn resolve<'a>(row: &'a RawRow, candidates: &[&str]) -> Option<&'a CellValue> {
    candidates
        .iter()
        .filter_map(|column| row.get(column))
        .find(|value| !value.is_missing() && !value.to_string().trim().is_empty())
}

fn resolve_text(row: &RawRow, candidates: &[&str]) -> String {
    resolve(row, candidates)
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Format a customer number.
///
/// Purely numeric ids lose their leading branch zero when a spreadsheet
/// coerces the column to a number, so one is put back. Anything else is only
/// trimmed.
pub fn format_customer_id(value: &CellValue) -> String {
    if value.is_missing() {
        return String::new();
    }
    pad_customer_id(&value.to_string())
}

/// String form of [`format_customer_id`].
pub fn pad_customer_id(raw: &str) -> String {
    let trimmed = raw.trim();
    let numeric = !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit());
    if numeric && !trimmed.starts_with('0') {
        format!("0{trimmed}")
    } else {
        trimmed.to_string()
    }
}
