//! SPK generation - normalization, layout and the per-batch pipeline.
//!
//! - `model` - canonical `CustomerRecord` and `DocumentType`
//! - `normalizer` - raw spreadsheet row to `CustomerRecord`
//! - `layout` - two-up notice page stamping
//! - `logo` - lazily loaded letterhead image
//! - `batch` - one output document per sheet

pub mod batch;
pub mod layout;
pub mod logo;
pub mod model;
pub mod normalizer;

pub use batch::{BatchOutcome, BatchReport, BatchStatus, GenerationReport, SpkGenerator};
pub use layout::{render, LayoutOptions};
pub use logo::{LogoCache, LogoImage};
pub use model::{CustomerRecord, DocumentType};
pub use normalizer::{format_customer_id, normalize, pad_customer_id, RecordDefaults};

use thiserror::Error;

use crate::source::SourceError;
use crate::surface::SurfaceError;

/// Batch-level failures. Field-level problems never get here.
#[derive(Debug, Error)]
pub enum SpkError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
