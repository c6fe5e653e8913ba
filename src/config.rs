//! Runtime configuration read from the environment (and `.env`).

use std::env;
use std::path::PathBuf;

use crate::spk::normalizer::{RecordDefaults, DEFAULT_BRANCH, DEFAULT_MANAGER};
use crate::surface::engine::DEFAULT_TYPST_BIN;

const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_LOGO_PATH: &str = "logo/images.png";
const DEFAULT_WORKBOOK: &str = "PENYEGELAN & PENCABUTAN JAN 26.xlsx";
const DEFAULT_CSV_FILE: &str = "data_pelanggan.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpkConfig {
    pub output_dir: PathBuf,
    pub logo_path: PathBuf,
    pub default_workbook: PathBuf,
    pub csv_file: PathBuf,
    pub typst_bin: PathBuf,
    pub defaults: RecordDefaults,
}

impl Default for SpkConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            logo_path: PathBuf::from(DEFAULT_LOGO_PATH),
            default_workbook: PathBuf::from(DEFAULT_WORKBOOK),
            csv_file: PathBuf::from(DEFAULT_CSV_FILE),
            typst_bin: PathBuf::from(DEFAULT_TYPST_BIN),
            defaults: RecordDefaults::default(),
        }
    }
}

impl SpkConfig {
    /// Load `.env` if present, then read `SPK_*` variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            match lookup(key).filter(|value| !value.trim().is_empty()) {
                Some(value) => value,
                None => {
                    log::debug!("{} not set, using default '{}'", key, default);
                    default.to_string()
                }
            }
        };

        Self {
            output_dir: get("SPK_OUTPUT_DIR", DEFAULT_OUTPUT_DIR).into(),
            logo_path: get("SPK_LOGO_PATH", DEFAULT_LOGO_PATH).into(),
            default_workbook: get("SPK_DEFAULT_WORKBOOK", DEFAULT_WORKBOOK).into(),
            csv_file: get("SPK_CSV_FILE", DEFAULT_CSV_FILE).into(),
            typst_bin: get("TYPST_BIN", DEFAULT_TYPST_BIN).into(),
            defaults: RecordDefaults {
                branch: get("SPK_DEFAULT_BRANCH", DEFAULT_BRANCH),
                manager_name: get("SPK_DEFAULT_MANAGER", DEFAULT_MANAGER),
            },
        }
    }
}
