//! Letterhead logo, loaded lazily and at most once per run.

use std::cell::OnceCell;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};

/// Decoded logo, re-encoded as RGBA PNG so every backend can embed it.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoImage {
    pub file_name: String,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl LogoImage {
    /// Decode any supported image; palette images are expanded to RGBA.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let decoded = image::load_from_memory(bytes)?;
        let rgba = DynamicImage::ImageRgba8(decoded.to_rgba8());

        let mut png = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        Ok(Self {
            file_name: "logo.png".to_string(),
            png,
            width: rgba.width(),
            height: rgba.height(),
        })
    }
}

/// Owned, lazily populated logo handle.
///
/// A missing or unreadable file is remembered as "no logo" so the file
/// system is touched only once.
#[derive(Debug, Default)]
pub struct LogoCache {
    path: Option<PathBuf>,
    loaded: OnceCell<Option<LogoImage>>,
}

impl LogoCache {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            loaded: OnceCell::new(),
        }
    }

    /// A cache that never yields a logo.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Pre-populated cache, mostly useful for tests.
    pub fn with_image(image: LogoImage) -> Self {
        let loaded = OnceCell::new();
        let _ = loaded.set(Some(image));
        Self { path: None, loaded }
    }

    pub fn get(&self) -> Option<&LogoImage> {
        self.loaded
            .get_or_init(|| self.path.as_deref().and_then(load_logo))
            .as_ref()
    }
}

fn load_logo(path: &Path) -> Option<LogoImage> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::debug!("Logo not available at {}: {}", path.display(), e);
            return None;
        }
    };

    match LogoImage::from_bytes(&bytes) {
        Ok(image) => {
            log::debug!("Loaded logo {}x{} from {}", image.width, image.height, path.display());
            Some(image)
        }
        Err(e) => {
            log::debug!("Logo at {} could not be decoded: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn tiny_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(4, 2, Rgba([0, 80, 160, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_missing_file_degrades_to_none() {
        let cache = LogoCache::new(Some(PathBuf::from("/nonexistent/logo/images.png")));
        assert!(cache.get().is_none());
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_garbage_file_degrades_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("images.png");
        std::fs::write(&path, b"not an image").unwrap();

        let cache = LogoCache::new(Some(path));
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_loads_once_and_reuses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("images.png");
        std::fs::write(&path, tiny_png()).unwrap();

        let cache = LogoCache::new(Some(path.clone()));
        let first = cache.get().cloned().unwrap();
        assert_eq!((first.width, first.height), (4, 2));

        // Later reads come from memory even if the file disappears.
        std::fs::remove_file(&path).unwrap();
        assert_eq!(cache.get(), Some(&first));
    }

    #[test]
    fn test_disabled_cache() {
        assert!(LogoCache::disabled().get().is_none());
    }
}
