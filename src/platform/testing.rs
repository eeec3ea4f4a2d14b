//! In-memory collaborators for tests.
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::io;
use std::rc::Rc;
use tiny_skia::Pixmap;

use crate::platform::assets::{RESOURCE_DATA, ResourceStore};
use crate::platform::clock::TimeSource;
use crate::render::fonts::{FontHandle, FontProvider, Typeface};
use crate::render::layout::Rect;

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .expect("valid test timestamp")
}

pub struct FixedClock {
    pub now: NaiveDateTime,
    pub hour24: bool,
}

impl TimeSource for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn is_24h(&self) -> bool {
        self.hour24
    }
}

#[derive(Default)]
pub struct MemoryResources {
    pub raw: HashMap<String, Vec<u8>>,
    pub background: Option<(u32, u32)>,
}

impl MemoryResources {
    pub fn with_blob(blob: Vec<u8>) -> Self {
        let mut raw = HashMap::new();
        raw.insert(RESOURCE_DATA.to_string(), blob);
        Self {
            raw,
            background: None,
        }
    }
}

impl ResourceStore for MemoryResources {
    fn read_raw(&self, id: &str) -> io::Result<Vec<u8>> {
        self.raw
            .get(id)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, id.to_string()))
    }

    fn load_image(&self, _id: &str) -> Option<Pixmap> {
        let (w, h) = self.background?;
        Pixmap::new(w, h)
    }
}

/// Typeface that draws nothing
pub struct NullFace;

impl Typeface for NullFace {
    fn rasterize(&self, _: &mut Pixmap, _: &str, _: f32, _: (u8, u8, u8), _: Rect) {}
}

/// Font provider that records every load and unload
#[derive(Default)]
pub struct CountingFonts {
    pub loaded: Vec<String>,
    pub unloads: usize,
    pub system_lookups: usize,
    pub missing: bool,
}

impl FontProvider for CountingFonts {
    fn system_font(&mut self, _name: &str) -> Option<FontHandle> {
        if self.missing {
            return None;
        }
        self.system_lookups += 1;
        Some(Rc::new(NullFace))
    }

    fn load_custom_font(&mut self, resource_id: &str) -> Option<FontHandle> {
        if self.missing {
            return None;
        }
        self.loaded.push(resource_id.to_string());
        Some(Rc::new(NullFace))
    }

    fn unload_custom_font(&mut self, _font: &FontHandle) {
        self.unloads += 1;
    }
}
