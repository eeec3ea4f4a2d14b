/// Font handles, the font provider seam, and per-slot font ownership.
use std::cell::RefCell;
use std::rc::Rc;
use tiny_skia::Pixmap;
use tracing::{debug, warn};

use crate::face::model::FontSource;
use crate::render::layout::Rect;

/// Something that can rasterize a line of text.
pub trait Typeface {
    /// Draw `text` horizontally centered and top-aligned inside `area`,
    /// clipped to it.
    fn rasterize(&self, target: &mut Pixmap, text: &str, px: f32, rgb: (u8, u8, u8), area: Rect);
}

pub type FontHandle = Rc<dyn Typeface>;

/// Host font collaborator.
pub trait FontProvider {
    /// Look up a named platform font. The provider keeps ownership.
    fn system_font(&mut self, name: &str) -> Option<FontHandle>;
    /// Load a custom font from an embedded resource. Must be paired with
    /// exactly one `unload_custom_font`.
    fn load_custom_font(&mut self, resource_id: &str) -> Option<FontHandle>;
    fn unload_custom_font(&mut self, font: &FontHandle);
}

/// The face's ownership record of one resolved font. Custom fonts are
/// unloaded when the lease drops; system fonts never are.
pub enum FontLease {
    System(FontHandle),
    Custom {
        font: FontHandle,
        provider: Rc<RefCell<dyn FontProvider>>,
    },
}

impl FontLease {
    /// Resolve `source`, falling back to `default_resource` when a custom
    /// source names no resource.
    pub fn acquire(
        source: &FontSource,
        default_resource: &str,
        provider: &Rc<RefCell<dyn FontProvider>>,
    ) -> Option<Self> {
        match source {
            FontSource::System(name) => {
                let font = provider.borrow_mut().system_font(name);
                if font.is_none() {
                    warn!("System font {} not available", name);
                }
                font.map(FontLease::System)
            }
            FontSource::Custom(id) => {
                let id = if id.is_empty() { default_resource } else { id.as_str() };
                let font = provider.borrow_mut().load_custom_font(id);
                if font.is_none() {
                    warn!("Custom font resource {} failed to load", id);
                }
                font.map(|font| FontLease::Custom {
                    font,
                    provider: provider.clone(),
                })
            }
        }
    }

    pub fn font(&self) -> &FontHandle {
        match self {
            FontLease::System(font) => font,
            FontLease::Custom { font, .. } => font,
        }
    }
}

impl Drop for FontLease {
    fn drop(&mut self) {
        if let FontLease::Custom { font, provider } = self {
            match provider.try_borrow_mut() {
                Ok(mut provider) => {
                    provider.unload_custom_font(font);
                    debug!("Released custom font");
                }
                Err(_) => warn!("Font provider busy, custom font not released"),
            }
        }
    }
}

impl Typeface for rusttype::Font<'static> {
    fn rasterize(&self, target: &mut Pixmap, text: &str, px: f32, rgb: (u8, u8, u8), area: Rect) {
        if text.is_empty() || area.is_empty() {
            return;
        }

        let (r, g, b) = rgb;
        let scale = rusttype::Scale::uniform(px);
        let v_metrics = self.v_metrics(scale);

        let glyphs: Vec<_> = self
            .layout(text, scale, rusttype::point(0.0, v_metrics.ascent))
            .collect();

        let text_width = glyphs
            .last()
            .map(|g| match g.pixel_bounding_box() {
                Some(bb) => bb.max.x,
                None => (g.position().x + g.unpositioned().h_metrics().advance_width) as i32,
            })
            .unwrap_or(0);
        let offset_x = area.x + (area.width as i32 - text_width) / 2;
        let offset_y = area.y;

        // Clip to both the slot and the target
        let tw = target.width() as i32;
        let th = target.height() as i32;
        let min_x = area.x.max(0);
        let min_y = area.y.max(0);
        let max_x = (area.x + area.width as i32).min(tw);
        let max_y = (area.y + area.height as i32).min(th);
        let data = target.data_mut();

        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = offset_x + bb.min.x + gx as i32;
                    let py = offset_y + bb.min.y + gy as i32;

                    if px >= min_x && px < max_x && py >= min_y && py < max_y {
                        let alpha = (v * 255.0) as u8;
                        if alpha > 0 {
                            let idx = ((py * tw + px) * 4) as usize;
                            let a = alpha as f32 / 255.0;
                            let dst_a = data[idx + 3] as f32 / 255.0;
                            let out_a = a + dst_a * (1.0 - a);
                            if out_a > 0.0 {
                                data[idx] = ((r as f32 * a + data[idx] as f32 * (1.0 - a))
                                    .min(255.0 * out_a)) as u8;
                                data[idx + 1] = ((g as f32 * a
                                    + data[idx + 1] as f32 * (1.0 - a))
                                    .min(255.0 * out_a)) as u8;
                                data[idx + 2] = ((b as f32 * a
                                    + data[idx + 2] as f32 * (1.0 - a))
                                    .min(255.0 * out_a)) as u8;
                                data[idx + 3] = (out_a * 255.0) as u8;
                            }
                        }
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::CountingFonts;

    fn provider() -> (Rc<RefCell<CountingFonts>>, Rc<RefCell<dyn FontProvider>>) {
        let fonts = Rc::new(RefCell::new(CountingFonts::default()));
        let shared: Rc<RefCell<dyn FontProvider>> = fonts.clone();
        (fonts, shared)
    }

    #[test]
    fn test_custom_lease_releases_on_drop() {
        let (fonts, shared) = provider();
        let lease = FontLease::acquire(&FontSource::Custom(String::new()), "FONT_TIME", &shared)
            .unwrap();
        assert!(matches!(lease, FontLease::Custom { .. }));
        assert_eq!(fonts.borrow().loaded, vec!["FONT_TIME".to_string()]);
        assert_eq!(fonts.borrow().unloads, 0);

        drop(lease);
        assert_eq!(fonts.borrow().unloads, 1);
    }

    #[test]
    fn test_system_lease_never_releases() {
        let (fonts, shared) = provider();
        let lease =
            FontLease::acquire(&FontSource::System("GOTHIC_24".into()), "FONT_TIME", &shared)
                .unwrap();
        assert!(matches!(lease, FontLease::System(_)));
        drop(lease);
        assert_eq!(fonts.borrow().unloads, 0);
        assert!(fonts.borrow().loaded.is_empty());
        assert_eq!(fonts.borrow().system_lookups, 1);
    }

    #[test]
    fn test_missing_font_yields_no_lease() {
        let (fonts, shared) = provider();
        fonts.borrow_mut().missing = true;
        assert!(FontLease::acquire(&FontSource::Custom("X".into()), "FONT_TIME", &shared).is_none());
        assert_eq!(fonts.borrow().unloads, 0);
    }
}
