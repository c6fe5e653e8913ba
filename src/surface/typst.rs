//! Typst backend: every primitive becomes an absolutely placed element.
//!
//! Coordinates arrive bottom-left based and are flipped to Typst's top-left
//! origin. Text is set with its top edge on the baseline so a placed element's
//! `dy` lands exactly on the baseline the layout asked for. Each text run is
//! measured and boxed at its own width, so nothing wraps.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::engine::{Asset, TypstRenderEngine};
use super::{DrawingSurface, Font, FontWeight, PageSize, Point, Rect, Stroke, SurfaceError, TextAlign};
use crate::spk::logo::LogoImage;

pub struct TypstSurface {
    engine: TypstRenderEngine,
    output: PathBuf,
    page: PageSize,
    font: Font,
    pages: Vec<String>,
    current: String,
    assets: Vec<Asset>,
}

impl TypstSurface {
    pub fn new(engine: TypstRenderEngine, output: &Path, page: PageSize) -> Self {
        Self {
            engine,
            output: output.to_path_buf(),
            page,
            font: Font::default(),
            pages: Vec::new(),
            current: String::new(),
            assets: Vec::new(),
        }
    }

    /// Complete Typst source for everything drawn so far.
    pub fn source(&self) -> String {
        let mut source = format!(
            "#set page(width: {}, height: {}, margin: 0pt)\n\
             #set text(top-edge: \"baseline\", bottom-edge: \"baseline\")\n",
            pt(self.page.width),
            pt(self.page.height),
        );

        let mut pages: Vec<&str> = self.pages.iter().map(String::as_str).collect();
        if !self.current.is_empty() {
            pages.push(&self.current);
        }
        source.push_str(&pages.join("#pagebreak()\n"));
        source
    }

    fn flip(&self, y: f64) -> f64 {
        self.page.height - y
    }

    fn text_markup(&self, text: &str) -> String {
        let fonts = self
            .font
            .family
            .fallbacks()
            .iter()
            .map(|name| format!("\"{}\"", escape_typst_string(name)))
            .collect::<Vec<_>>()
            .join(", ");
        let weight = match self.font.weight {
            FontWeight::Regular => "regular",
            FontWeight::Bold => "bold",
        };
        format!(
            "text(font: ({fonts},), size: {}, weight: \"{weight}\", \"{}\")",
            pt(self.font.size),
            escape_typst_string(text),
        )
    }
}

impl DrawingSurface for TypstSurface {
    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn draw_text(&mut self, at: Point, text: &str, align: TextAlign) {
        // Share of the measured width to shift left by.
        let shift = match align {
            TextAlign::Left => "0",
            TextAlign::Center => "0.5",
            TextAlign::Right => "1",
        };
        let markup = self.text_markup(text);
        let dy = self.flip(at.y);
        let _ = writeln!(
            self.current,
            "#context {{ let body = {markup}; let w = measure(body).width; \
             place(top + left, dx: {} - w * {shift}, dy: {}, box(width: w + 1pt, body)) }}",
            pt(at.x),
            pt(dy),
        );
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        let dash = match stroke.dash {
            Some((on, off)) => format!(", dash: ({}, {})", pt(on), pt(off)),
            None => String::new(),
        };
        let (y1, y2) = (self.flip(from.y), self.flip(to.y));
        let _ = writeln!(
            self.current,
            "#place(top + left, line(start: ({}, {}), end: ({}, {}), stroke: (paint: black, thickness: {}{dash})))",
            pt(from.x),
            pt(y1),
            pt(to.x),
            pt(y2),
            pt(stroke.width),
        );
    }

    fn draw_image(&mut self, image: &LogoImage, rect: Rect) {
        if !self.assets.iter().any(|asset| asset.name == image.file_name) {
            self.assets.push(Asset {
                name: image.file_name.clone(),
                bytes: image.png.clone(),
            });
        }
        let top = self.flip(rect.origin.y + rect.height);
        let _ = writeln!(
            self.current,
            "#place(top + left, dx: {}, dy: {}, image(\"{}\", width: {}, height: {}, fit: \"contain\"))",
            pt(rect.origin.x),
            pt(top),
            escape_typst_string(&image.file_name),
            pt(rect.width),
            pt(rect.height),
        );
    }

    fn show_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
    }

    fn finish(self: Box<Self>) -> Result<(), SurfaceError> {
        let source = self.source();
        log::debug!(
            "Compiling {} page(s) to {}",
            self.pages.len(),
            self.output.display()
        );
        self.engine
            .render_to_file(&source, &self.assets, &self.output)
    }
}

fn pt(value: f64) -> String {
    format!("{value:.2}pt")
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> TypstSurface {
        TypstSurface::new(
            TypstRenderEngine::default(),
            Path::new("/tmp/out.pdf"),
            PageSize::A4_LANDSCAPE,
        )
    }

    #[test]
    fn test_escape_typst_string() {
        assert_eq!(escape_typst_string(r#"a "b" \c"#), r#"a \"b\" \\c"#);
    }

    #[test]
    fn test_text_is_flipped_and_aligned() {
        let mut s = surface();
        s.set_font(Font::bold(11.0));
        s.draw_text(Point::new(100.0, 595.275_590_551_181_2 - 50.0), "TIRTA \"TARUM\"", TextAlign::Center);

        let source = s.source();
        assert!(source.contains("dx: 100.00pt - w * 0.5, dy: 50.00pt"));
        assert!(source.contains("let w = measure(body).width"));
        assert!(source.contains("weight: \"bold\""));
        assert!(source.contains("size: 11.00pt"));
        assert!(source.contains(r#"TIRTA \"TARUM\""#));
    }

    #[test]
    fn test_text_box_is_sized_to_content() {
        let mut s = surface();
        let long = "x".repeat(400);
        s.draw_text(Point::new(800.0, 100.0), &long, TextAlign::Right);

        let source = s.source();
        assert!(source.contains("dx: 800.00pt - w * 1,"));
        assert!(source.contains("box(width: w + 1pt, body)"));
        assert!(!source.contains("1000.00pt"));
    }

    #[test]
    fn test_dashed_line() {
        let mut s = surface();
        s.draw_line(Point::new(10.0, 10.0), Point::new(10.0, 20.0), Stroke::dashed(0.5, 3.0, 3.0));
        let source = s.source();
        assert!(source.contains("thickness: 0.50pt, dash: (3.00pt, 3.00pt)"));
    }

    #[test]
    fn test_pages_are_separated_by_pagebreaks() {
        let mut s = surface();
        s.draw_text(Point::new(0.0, 0.0), "one", TextAlign::Left);
        s.show_page();
        s.draw_text(Point::new(0.0, 0.0), "two", TextAlign::Left);
        s.show_page();

        let source = s.source();
        assert_eq!(source.matches("#pagebreak()").count(), 1);
        assert!(source.starts_with("#set page(width: 841.89pt, height: 595.28pt, margin: 0pt)"));
    }

    #[test]
    fn test_image_registers_asset_once() {
        let logo = LogoImage {
            file_name: "logo.png".into(),
            png: vec![1, 2, 3],
            width: 1,
            height: 1,
        };
        let rect = Rect {
            origin: Point::new(0.0, 0.0),
            width: 10.0,
            height: 10.0,
        };
        let mut s = surface();
        s.draw_image(&logo, rect);
        s.draw_image(&logo, rect);
        assert_eq!(s.assets.len(), 1);
        assert!(s.source().contains("fit: \"contain\""));
    }
}
