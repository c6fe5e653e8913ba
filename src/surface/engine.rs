//! Typst rendering engine.
//!
//! Handles the low-level details of writing Typst source and its assets to a
//! temporary directory, invoking the compiler, and collecting the output PDF.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;
use tempfile::TempDir;

use super::{DrawingSurface, PageSize, SurfaceError, SurfaceFactory, TypstSurface};

const SOURCE_FILE: &str = "spk.typ";
const OUTPUT_FILE: &str = "spk.pdf";
pub const DEFAULT_TYPST_BIN: &str = "typst";

/// Extra file the Typst source refers to (e.g. the logo image).
#[derive(Debug, Clone)]
pub struct Asset {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Compiles Typst documents to PDF through the `typst` CLI.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    binary: PathBuf,
}

impl Default for TypstRenderEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TYPST_BIN)
    }
}

impl TypstRenderEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Render a Typst string to PDF bytes.
    pub fn render(&self, typst_source: &str, assets: &[Asset]) -> Result<Vec<u8>, SurfaceError> {
        // Create temp directory for compilation context
        let temp_dir = tempdir().map_err(SurfaceError::TempDir)?;

        fs::write(temp_dir.path().join(SOURCE_FILE), typst_source)
            .map_err(SurfaceError::WriteTypst)?;
        for asset in assets {
            fs::write(temp_dir.path().join(&asset.name), &asset.bytes)
                .map_err(SurfaceError::WriteTypst)?;
        }

        self.compile_typst_to_pdf(&temp_dir)
    }

    /// Render and write the PDF to `output`.
    pub fn render_to_file(
        &self,
        typst_source: &str,
        assets: &[Asset],
        output: &Path,
    ) -> Result<(), SurfaceError> {
        let pdf = self.render(typst_source, assets)?;
        fs::write(output, pdf).map_err(|source| SurfaceError::Write {
            path: output.display().to_string(),
            source,
        })
    }

    fn compile_typst_to_pdf(&self, temp_dir: &TempDir) -> Result<Vec<u8>, SurfaceError> {
        let typ_path = temp_dir.path().join(SOURCE_FILE);
        let output_path = temp_dir.path().join(OUTPUT_FILE);

        let status = Command::new(&self.binary)
            .arg("compile")
            .arg(&typ_path)
            .arg(&output_path)
            .current_dir(temp_dir.path())
            .status()
            .map_err(SurfaceError::TypstIo)?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            return Err(SurfaceError::TypstExit(code));
        }

        fs::read(&output_path).map_err(SurfaceError::ReadPdf)
    }
}

impl SurfaceFactory for TypstRenderEngine {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn create(
        &self,
        output: &Path,
        page: PageSize,
    ) -> Result<Box<dyn DrawingSurface>, SurfaceError> {
        Ok(Box::new(TypstSurface::new(self.clone(), output, page)))
    }
}
