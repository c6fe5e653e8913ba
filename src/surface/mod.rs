//! Drawing surfaces - the page-drawing port used by the layout engine.
//!
//! The layout engine only speaks [`DrawingSurface`]; concrete backends decide
//! how the draw stream becomes a file:
//! - `typst` - absolute-positioned Typst markup compiled to PDF
//! - `recording` - in-memory op log, dumped as JSON

pub mod engine;
pub mod recording;
pub mod typst;

pub use engine::TypstRenderEngine;
pub use recording::{DrawOp, RecordingFactory, RecordingSurface};
pub use typst::TypstSurface;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spk::logo::LogoImage;

/// Errors that can occur while finishing a document.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
    #[error("failed to serialize layout: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write output file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A position in PDF points, origin at the bottom-left corner of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Physical page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub const A4_LANDSCAPE: Self = Self {
        width: 841.889_763_779_527_5,
        height: 595.275_590_551_181_2,
    };
}

/// Axis-aligned box; `origin` is its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    Helvetica,
}

impl FontFamily {
    /// Font names to try in order; the first one installed is used.
    pub fn fallbacks(&self) -> &'static [&'static str] {
        match self {
            Self::Helvetica => &["Helvetica", "Arial", "Liberation Sans", "DejaVu Sans"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: FontFamily,
    pub size: f64,
    pub weight: FontWeight,
}

impl Font {
    pub fn regular(size: f64) -> Self {
        Self {
            family: FontFamily::Helvetica,
            size,
            weight: FontWeight::Regular,
        }
    }

    pub fn bold(size: f64) -> Self {
        Self {
            family: FontFamily::Helvetica,
            size,
            weight: FontWeight::Bold,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::regular(10.0)
    }
}

/// Line style: width in points plus an optional on/off dash pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f64,
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    pub fn solid(width: f64) -> Self {
        Self { width, dash: None }
    }

    pub fn dashed(width: f64, on: f64, off: f64) -> Self {
        Self {
            width,
            dash: Some((on, off)),
        }
    }
}

/// Primitive drawing operations needed to stamp a notice page.
pub trait DrawingSurface {
    fn set_font(&mut self, font: Font);

    fn draw_text(&mut self, at: Point, text: &str, align: TextAlign);

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke);

    /// Draw an image scaled to fit inside `rect`, keeping its aspect ratio.
    fn draw_image(&mut self, image: &LogoImage, rect: Rect);

    /// Close the current page and start a new one.
    fn show_page(&mut self);

    /// Flush the document to its destination.
    fn finish(self: Box<Self>) -> Result<(), SurfaceError>;
}

/// Creates a fresh surface writing to `output`.
pub trait SurfaceFactory {
    /// File extension of the produced documents, without the dot.
    fn extension(&self) -> &'static str;

    fn create(&self, output: &Path, page: PageSize)
        -> Result<Box<dyn DrawingSurface>, SurfaceError>;
}
