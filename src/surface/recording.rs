//! In-memory surface that keeps every draw call.
//!
//! Used for `--format json` layout dumps and by the tests to inspect pages
//! without a PDF toolchain.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DrawingSurface, Font, PageSize, Point, Rect, Stroke, SurfaceError, SurfaceFactory, TextAlign};
use crate::spk::logo::LogoImage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    SetFont(Font),
    Text {
        at: Point,
        text: String,
        align: TextAlign,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Image {
        name: String,
        rect: Rect,
    },
    ShowPage,
}

/// Layout dump written by [`RecordingSurface::finish`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDump {
    pub page: PageSize,
    pub ops: Vec<DrawOp>,
}

impl LayoutDump {
    /// Ops grouped per page; a trailing unfinished page is dropped.
    pub fn pages(&self) -> Vec<&[DrawOp]> {
        split_pages(&self.ops)
    }
}

#[derive(Debug)]
pub struct RecordingSurface {
    page: PageSize,
    ops: Vec<DrawOp>,
    output: Option<PathBuf>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    /// Surface that only keeps ops in memory.
    pub fn new() -> Self {
        Self {
            page: PageSize::A4_LANDSCAPE,
            ops: Vec::new(),
            output: None,
        }
    }

    /// Surface that writes a JSON [`LayoutDump`] to `output` on finish.
    pub fn to_file(output: &Path, page: PageSize) -> Self {
        Self {
            page,
            ops: Vec::new(),
            output: Some(output.to_path_buf()),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn pages(&self) -> Vec<&[DrawOp]> {
        split_pages(&self.ops)
    }

    /// Every text drawn, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn split_pages(ops: &[DrawOp]) -> Vec<&[DrawOp]> {
    let mut pages = Vec::new();
    let mut start = 0;
    for (index, op) in ops.iter().enumerate() {
        if matches!(op, DrawOp::ShowPage) {
            pages.push(&ops[start..index]);
            start = index + 1;
        }
    }
    pages
}

impl DrawingSurface for RecordingSurface {
    fn set_font(&mut self, font: Font) {
        self.ops.push(DrawOp::SetFont(font));
    }

    fn draw_text(&mut self, at: Point, text: &str, align: TextAlign) {
        self.ops.push(DrawOp::Text {
            at,
            text: text.to_string(),
            align,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.ops.push(DrawOp::Line { from, to, stroke });
    }

    fn draw_image(&mut self, image: &LogoImage, rect: Rect) {
        self.ops.push(DrawOp::Image {
            name: image.file_name.clone(),
            rect,
        });
    }

    fn show_page(&mut self) {
        self.ops.push(DrawOp::ShowPage);
    }

    fn finish(self: Box<Self>) -> Result<(), SurfaceError> {
        let Some(output) = self.output else {
            return Ok(());
        };
        let dump = LayoutDump {
            page: self.page,
            ops: self.ops,
        };
        let json = serde_json::to_vec_pretty(&dump).map_err(SurfaceError::Serialize)?;
        std::fs::write(&output, json).map_err(|source| SurfaceError::Write {
            path: output.display().to_string(),
            source,
        })
    }
}

/// Factory producing JSON layout dumps instead of PDFs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordingFactory;

impl SurfaceFactory for RecordingFactory {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn create(
        &self,
        output: &Path,
        page: PageSize,
    ) -> Result<Box<dyn DrawingSurface>, SurfaceError> {
        Ok(Box::new(RecordingSurface::to_file(output, page)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pages_drops_unfinished_tail() {
        let mut surface = RecordingSurface::new();
        surface.draw_text(Point::new(0.0, 0.0), "a", TextAlign::Left);
        surface.show_page();
        surface.draw_text(Point::new(0.0, 0.0), "b", TextAlign::Left);

        let pages = surface.pages();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].len(), 1);
    }

    #[test]
    fn test_finish_writes_json_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SPK_TEST.json");

        let mut surface = Box::new(RecordingSurface::to_file(&path, PageSize::A4_LANDSCAPE));
        surface.set_font(Font::regular(9.0));
        surface.draw_text(Point::new(1.0, 2.0), "Merk Meter", TextAlign::Left);
        surface.show_page();
        surface.finish().unwrap();

        let dump: LayoutDump = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(dump.pages().len(), 1);
        assert_eq!(dump.ops.len(), 3);
    }
}
