/// Resource directory and font shelf: the host's view of embedded resources.
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tiny_skia::Pixmap;
use tracing::{debug, warn};

use crate::render::fonts::{FontHandle, FontProvider};

pub const RESOURCE_DATA: &str = "DATA";
pub const RESOURCE_BACKGROUND: &str = "IMAGE_BACKGROUND";
pub const FONT_TIME: &str = "FONT_TIME";
pub const FONT_DATE: &str = "FONT_DATE";
pub const FONT_TEXT: &str = "FONT_TEXT";

/// Read access to embedded resources by id.
pub trait ResourceStore {
    fn read_raw(&self, id: &str) -> io::Result<Vec<u8>>;
    fn load_image(&self, id: &str) -> Option<Pixmap>;
}

/// File name a resource id is stored under
pub fn resource_file(id: &str) -> String {
    match id {
        RESOURCE_DATA => "data.bin".to_string(),
        RESOURCE_BACKGROUND => "background.png".to_string(),
        FONT_TIME => "font_time.ttf".to_string(),
        FONT_DATE => "font_date.ttf".to_string(),
        FONT_TEXT => "font_text.ttf".to_string(),
        other => format!("{}.ttf", other.to_lowercase()),
    }
}

/// Resources laid out as files in one directory
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_of(&self, id: &str) -> PathBuf {
        self.root.join(resource_file(id))
    }
}

impl ResourceStore for AssetDir {
    fn read_raw(&self, id: &str) -> io::Result<Vec<u8>> {
        let path = self.path_of(id);
        debug!("Reading resource {} from {}", id, path.display());
        std::fs::read(path)
    }

    fn load_image(&self, id: &str) -> Option<Pixmap> {
        let path = self.path_of(id);
        debug!("Loading image: {}", path.display());

        match image::open(&path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (w, h) = (rgba.width(), rgba.height());
                // tiny-skia expects premultiplied alpha RGBA
                let mut pixmap = Pixmap::new(w, h)?;
                let data = pixmap.data_mut();
                for (i, pixel) in rgba.pixels().enumerate() {
                    let a = pixel[3] as f32 / 255.0;
                    data[i * 4] = (pixel[0] as f32 * a) as u8;
                    data[i * 4 + 1] = (pixel[1] as f32 * a) as u8;
                    data[i * 4 + 2] = (pixel[2] as f32 * a) as u8;
                    data[i * 4 + 3] = pixel[3];
                }
                Some(pixmap)
            }
            Err(e) => {
                warn!("Failed to load image {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Fonts backed by TrueType files: custom fonts from the resource
/// directory, system fonts by name from a system font directory.
pub struct FontShelf {
    resources: AssetDir,
    system_dir: PathBuf,
    /// System fonts stay owned by the shelf for its whole lifetime
    system_cache: HashMap<String, FontHandle>,
    custom_loaded: usize,
}

impl FontShelf {
    pub fn new(resource_dir: impl Into<PathBuf>, system_dir: impl Into<PathBuf>) -> Self {
        Self {
            resources: AssetDir::new(resource_dir),
            system_dir: system_dir.into(),
            system_cache: HashMap::new(),
            custom_loaded: 0,
        }
    }

    fn read_font(path: &Path) -> Option<FontHandle> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                debug!("Font {} unreadable: {}", path.display(), e);
                return None;
            }
        };
        match rusttype::Font::try_from_vec(bytes) {
            Some(font) => Some(Rc::new(font)),
            None => {
                warn!("Font {} is not a usable TrueType font", path.display());
                None
            }
        }
    }
}

impl FontProvider for FontShelf {
    fn system_font(&mut self, name: &str) -> Option<FontHandle> {
        if let Some(font) = self.system_cache.get(name) {
            return Some(font.clone());
        }

        let candidates = [
            self.system_dir.join(format!("{name}.ttf")),
            self.system_dir.join(format!("{}.ttf", name.to_lowercase())),
        ];
        let font = candidates.iter().find_map(|p| Self::read_font(p))?;
        debug!("Resolved system font {}", name);
        self.system_cache.insert(name.to_string(), font.clone());
        Some(font)
    }

    fn load_custom_font(&mut self, resource_id: &str) -> Option<FontHandle> {
        let font = Self::read_font(&self.resources.path_of(resource_id))?;
        self.custom_loaded += 1;
        debug!("Loaded custom font {} ({} live)", resource_id, self.custom_loaded);
        Some(font)
    }

    fn unload_custom_font(&mut self, _font: &FontHandle) {
        self.custom_loaded = self.custom_loaded.saturating_sub(1);
        debug!("Unloaded custom font ({} live)", self.custom_loaded);
    }
}

impl Drop for FontShelf {
    fn drop(&mut self) {
        if self.custom_loaded > 0 {
            warn!("{} custom font(s) never released", self.custom_loaded);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("clockface-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_resource_file_names() {
        assert_eq!(resource_file(RESOURCE_DATA), "data.bin");
        assert_eq!(resource_file(RESOURCE_BACKGROUND), "background.png");
        assert_eq!(resource_file(FONT_DATE), "font_date.ttf");
        assert_eq!(resource_file("FONT_BIG"), "font_big.ttf");
    }

    #[test]
    fn test_read_raw_from_dir() {
        let dir = scratch_dir("raw");
        std::fs::write(dir.join("data.bin"), [1u8, 2, 3]).unwrap();
        let assets = AssetDir::new(&dir);
        assert_eq!(assets.read_raw(RESOURCE_DATA).unwrap(), vec![1, 2, 3]);
        assert!(assets.load_image(RESOURCE_BACKGROUND).is_none());
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_fonts_are_not_counted() {
        let dir = scratch_dir("fonts");
        std::fs::write(dir.join("font_time.ttf"), b"not a font").unwrap();
        let mut shelf = FontShelf::new(&dir, &dir);
        assert!(shelf.load_custom_font(FONT_TIME).is_none());
        assert!(shelf.load_custom_font(FONT_DATE).is_none());
        assert!(shelf.system_font("GOTHIC_24").is_none());
        assert_eq!(shelf.custom_loaded, 0);
        std::fs::remove_dir_all(dir).ok();
    }
}
