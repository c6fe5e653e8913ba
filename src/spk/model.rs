//! Canonical record and document-type definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One customer case, ready to be stamped onto a notice.
///
/// Every field is plain text; missing source values are already collapsed to
/// empty strings by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Nomor pelanggan, zero-padded when numeric.
    pub customer_id: String,
    pub name: String,
    /// Jumlah bulan tunggakan, kept as text.
    pub arrears_months: String,
    /// Total tagihan, printed as-is after "Rp.".
    pub arrears_amount: String,
    pub branch: String,
    pub manager_name: String,
}

impl CustomerRecord {
    /// A record without a customer number cannot become a notice.
    pub fn is_renderable(&self) -> bool {
        !self.customer_id.is_empty()
    }
}

/// The two SPK cases handled by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Penyegelan (meter sealing).
    Sealing,
    /// Pencabutan (meter removal).
    Removal,
}

impl DocumentType {
    /// Name printed in the title and the instruction sentence.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sealing => "PENYEGELAN",
            Self::Removal => "PENCABUTAN",
        }
    }

    /// Pick the type of a batch from its sheet name.
    ///
    /// Any name mentioning PENYEGELAN is a sealing batch, everything else is
    /// treated as removal.
    pub fn from_batch_name(name: &str) -> Self {
        if name.to_uppercase().contains("PENYEGELAN") {
            Self::Sealing
        } else {
            Self::Removal
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sealing" | "penyegelan" => Ok(Self::Sealing),
            "removal" | "pencabutan" => Ok(Self::Removal),
            other => Err(format!(
                "unknown document type '{other}' (expected penyegelan or pencabutan)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_name_dispatch() {
        assert_eq!(DocumentType::from_batch_name("PENYEGELAN"), DocumentType::Sealing);
        assert_eq!(DocumentType::from_batch_name("penyegelan jan"), DocumentType::Sealing);
        assert_eq!(DocumentType::from_batch_name("PENCABUTAN"), DocumentType::Removal);
        assert_eq!(DocumentType::from_batch_name("Sheet1"), DocumentType::Removal);
    }

    #[test]
    fn test_from_str_accepts_both_spellings() {
        assert_eq!("Sealing".parse::<DocumentType>(), Ok(DocumentType::Sealing));
        assert_eq!("PENCABUTAN".parse::<DocumentType>(), Ok(DocumentType::Removal));
        assert!("segel".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&DocumentType::Removal).unwrap();
        assert_eq!(json, r#""removal""#);
    }

    #[test]
    fn test_empty_id_is_not_renderable() {
        let record = CustomerRecord {
            name: "Ani".into(),
            ..Default::default()
        };
        assert!(!record.is_renderable());
    }
}
