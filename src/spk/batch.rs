//! Batch pipeline: rows → records → one document per sheet.
//!
//! Sheets are processed strictly one after another. A failing sheet is
//! reported and skipped; files already written for earlier sheets stay.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::source::{RowSource, Sheet};
use crate::surface::SurfaceFactory;

use super::layout::{self, LayoutOptions};
use super::logo::LogoCache;
use super::model::{CustomerRecord, DocumentType};
use super::normalizer::{normalize_all, RecordDefaults};
use super::SpkError;

/// Batch name used for the pre-loaded CSV data.
pub const CSV_BATCH_NAME: &str = "PENYEGELAN";

/// Result of rendering a single batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Generated { path: PathBuf, pages: usize },
    /// No record had a customer number; no file was written.
    NothingGenerated,
}

/// Per-batch entry of a [`GenerationReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchStatus {
    Generated { path: PathBuf, pages: usize },
    NothingGenerated,
    Failed { error: String },
}

impl From<BatchOutcome> for BatchStatus {
    fn from(outcome: BatchOutcome) -> Self {
        match outcome {
            BatchOutcome::Generated { path, pages } => Self::Generated { path, pages },
            BatchOutcome::NothingGenerated => Self::NothingGenerated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub batch: String,
    pub document_type: DocumentType,
    pub records: usize,
    #[serde(flatten)]
    pub status: BatchStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub batches: Vec<BatchReport>,
}

impl GenerationReport {
    pub fn generated_files(&self) -> Vec<&Path> {
        self.batches
            .iter()
            .filter_map(|batch| match &batch.status {
                BatchStatus::Generated { path, .. } => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.batches
            .iter()
            .map(|batch| match batch.status {
                BatchStatus::Generated { pages, .. } => pages,
                _ => 0,
            })
            .sum()
    }

    pub fn failures(&self) -> usize {
        self.batches
            .iter()
            .filter(|batch| matches!(batch.status, BatchStatus::Failed { .. }))
            .count()
    }
}

/// `dir/SPK_{name}.{ext}`, with the batch name made filesystem-safe.
pub fn output_path(dir: &Path, batch_name: &str, extension: &str) -> PathBuf {
    let safe = sanitize_filename::sanitize(batch_name.trim());
    let safe = if safe.is_empty() { "batch".to_string() } else { safe };
    dir.join(format!("SPK_{safe}.{extension}"))
}

/// Everything a generation run needs, built once and reused for every batch.
pub struct SpkGenerator {
    factory: Box<dyn SurfaceFactory>,
    logo: LogoCache,
    defaults: RecordDefaults,
    options: LayoutOptions,
    output_dir: PathBuf,
}

impl SpkGenerator {
    pub fn new(factory: Box<dyn SurfaceFactory>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            factory,
            logo: LogoCache::disabled(),
            defaults: RecordDefaults::default(),
            options: LayoutOptions::default(),
            output_dir: output_dir.into(),
        }
    }

    pub fn with_logo(mut self, logo: LogoCache) -> Self {
        self.logo = logo;
        self
    }

    pub fn with_defaults(mut self, defaults: RecordDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn defaults(&self) -> &RecordDefaults {
        &self.defaults
    }

    /// Render already-normalized records into `SPK_{name}`.
    pub fn generate_batch(
        &self,
        name: &str,
        records: &[CustomerRecord],
        doc_type: DocumentType,
    ) -> Result<BatchOutcome, SpkError> {
        if !records.iter().any(CustomerRecord::is_renderable) {
            log::info!("Batch '{}': nothing to generate", name);
            return Ok(BatchOutcome::NothingGenerated);
        }

        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir).map_err(|source| SpkError::OutputDir {
                path: self.output_dir.display().to_string(),
                source,
            })?;
            log::info!("Created output directory {}", self.output_dir.display());
        }

        let path = output_path(&self.output_dir, name, self.factory.extension());
        let mut surface = self.factory.create(&path, layout::PAGE)?;
        let pages = layout::render(records, doc_type, &mut *surface, &self.logo, &self.options);
        surface.finish()?;

        log::info!(
            "Batch '{}' ({}): {} page(s) -> {}",
            name,
            doc_type,
            pages,
            path.display()
        );
        Ok(BatchOutcome::Generated { path, pages })
    }

    /// Normalize and render one sheet; its name decides the document type.
    pub fn generate_sheet(&self, sheet: &Sheet) -> BatchReport {
        let doc_type = DocumentType::from_batch_name(&sheet.name);
        let records = normalize_all(&sheet.rows, doc_type, &self.defaults);
        self.report(&sheet.name, &records, doc_type)
    }

    /// Render every sheet in order, one independent document each.
    pub fn generate_sheets(&self, sheets: &[Sheet]) -> GenerationReport {
        let total = sheets.len();
        let batches = sheets
            .iter()
            .enumerate()
            .map(|(index, sheet)| {
                log::info!("Generating {} ({}/{})", sheet.name, index + 1, total);
                self.generate_sheet(sheet)
            })
            .collect();
        GenerationReport { batches }
    }

    /// Read all sheets from `source`, then render them.
    ///
    /// A source that cannot be read fails as a whole; rendering failures are
    /// recorded per sheet.
    pub fn generate_from_source(
        &self,
        source: &mut dyn RowSource,
    ) -> Result<GenerationReport, SpkError> {
        let sheets = source.sheets()?;
        Ok(self.generate_sheets(&sheets))
    }

    /// Render the pre-loaded CSV batch as a sealing document.
    pub fn generate_csv_batch(&self, records: &[CustomerRecord]) -> BatchReport {
        self.report(CSV_BATCH_NAME, records, DocumentType::Sealing)
    }

    fn report(&self, name: &str, records: &[CustomerRecord], doc_type: DocumentType) -> BatchReport {
        let status = match self.generate_batch(name, records, doc_type) {
            Ok(outcome) => outcome.into(),
            Err(e) => {
                log::warn!("Batch '{}' failed: {}", name, e);
                BatchStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        BatchReport {
            batch: name.to_string(),
            document_type: doc_type,
            records: records.len(),
            status,
        }
    }
}
