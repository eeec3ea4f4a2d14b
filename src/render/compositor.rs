/// Compositor: owns the framebuffer and the z-ordered tree of drawable slots.
/// Canvas slots are painted lazily: marking one dirty only sets a flag, and
/// the next `composite` pass repaints it once no matter how many marks
/// accumulated.
use anyhow::{Context, Result};
use std::path::Path;
use tiny_skia::{Pixmap, PixmapPaint, Transform};
use tracing::{debug, warn};

use crate::face::palette::PaletteColor;
use crate::render::fonts::FontHandle;
use crate::render::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

pub struct TextStyle {
    pub font: Option<FontHandle>,
    pub size: f32,
    pub color: PaletteColor,
}

enum SlotContent {
    Image {
        image: Option<Pixmap>,
    },
    Text {
        style: TextStyle,
        text: String,
        writes: u32,
    },
    Canvas {
        surface: Option<Pixmap>,
        needs_repaint: bool,
    },
}

struct Slot {
    rect: Rect,
    content: SlotContent,
}

pub struct Compositor {
    framebuffer: Pixmap,
    backdrop: PaletteColor,
    /// Slot storage; destroyed slots leave a hole so ids are never reused
    slots: Vec<Option<Slot>>,
    /// Attached slots, bottom to top
    tree: Vec<SlotId>,
    frame: u64,
}

impl Compositor {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let framebuffer = Pixmap::new(width, height)
            .with_context(|| format!("Failed to create {width}x{height} framebuffer"))?;
        Ok(Self {
            framebuffer,
            backdrop: PaletteColor::BLACK,
            slots: Vec::new(),
            tree: Vec::new(),
            frame: 0,
        })
    }

    /// Colour shown where no slot covers the screen
    pub fn set_backdrop(&mut self, color: PaletteColor) {
        self.backdrop = color;
    }

    fn insert(&mut self, rect: Rect, content: SlotContent) -> SlotId {
        self.slots.push(Some(Slot { rect, content }));
        SlotId(self.slots.len() - 1)
    }

    pub fn create_image(&mut self, rect: Rect, image: Option<Pixmap>) -> SlotId {
        self.insert(rect, SlotContent::Image { image })
    }

    pub fn create_text(&mut self, rect: Rect, style: TextStyle) -> SlotId {
        self.insert(
            rect,
            SlotContent::Text {
                style,
                text: String::new(),
                writes: 0,
            },
        )
    }

    /// A zero-size canvas, or one larger than the screen, gets no surface
    /// and never paints.
    pub fn create_canvas(&mut self, rect: Rect) -> SlotId {
        let fits =
            rect.width <= self.framebuffer.width() && rect.height <= self.framebuffer.height();
        let surface = if fits {
            Pixmap::new(rect.width, rect.height)
        } else {
            warn!(
                "Canvas slot {}x{} exceeds the {}x{} screen, painting disabled",
                rect.width,
                rect.height,
                self.framebuffer.width(),
                self.framebuffer.height()
            );
            None
        };
        if fits && surface.is_none() {
            debug!("Canvas slot {:?} has no area, painting disabled", rect);
        }
        self.insert(
            rect,
            SlotContent::Canvas {
                surface,
                needs_repaint: false,
            },
        )
    }

    /// Attach on top of every slot attached so far.
    pub fn attach(&mut self, id: SlotId) {
        if self.slot(id).is_some() && !self.tree.contains(&id) {
            self.tree.push(id);
        }
    }

    /// Detach and free a slot. Returns false if it was already gone.
    pub fn destroy(&mut self, id: SlotId) -> bool {
        self.tree.retain(|&attached| attached != id);
        match self.slots.get_mut(id.0).and_then(Option::take) {
            Some(_) => true,
            None => {
                warn!("Slot {:?} destroyed twice", id);
                false
            }
        }
    }

    pub fn set_text(&mut self, id: SlotId, value: &str) {
        if let Some(Slot {
            content: SlotContent::Text { text, writes, .. },
            ..
        }) = self.slot_mut(id)
        {
            text.clear();
            text.push_str(value);
            *writes += 1;
        }
    }

    pub fn mark_dirty(&mut self, id: SlotId) {
        if let Some(Slot {
            content: SlotContent::Canvas { needs_repaint, .. },
            ..
        }) = self.slot_mut(id)
        {
            *needs_repaint = true;
        }
    }

    #[cfg(test)]
    pub fn needs_repaint(&self, id: SlotId) -> bool {
        matches!(
            self.slot(id),
            Some(Slot {
                content: SlotContent::Canvas {
                    needs_repaint: true,
                    ..
                },
                ..
            })
        )
    }

    #[cfg(test)]
    pub fn text(&self, id: SlotId) -> Option<&str> {
        match self.slot(id) {
            Some(Slot {
                content: SlotContent::Text { text, .. },
                ..
            }) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Number of text writes a slot has received
    #[cfg(test)]
    pub fn text_writes(&self, id: SlotId) -> u32 {
        match self.slot(id) {
            Some(Slot {
                content: SlotContent::Text { writes, .. },
                ..
            }) => *writes,
            _ => 0,
        }
    }

    #[cfg(test)]
    pub fn rect(&self, id: SlotId) -> Option<Rect> {
        self.slot(id).map(|s| s.rect)
    }

    pub fn tree(&self) -> &[SlotId] {
        &self.tree
    }

    pub fn live_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Run one compositing pass: repaint dirty canvases through `paint`,
    /// then blend every attached slot into the framebuffer in z-order.
    pub fn composite(&mut self, mut paint: impl FnMut(SlotId, &mut Pixmap)) -> &[u8] {
        for &id in &self.tree {
            if let Some(Slot {
                content: SlotContent::Canvas {
                    surface,
                    needs_repaint,
                },
                ..
            }) = self.slots.get_mut(id.0).and_then(Option::as_mut)
            {
                if !*needs_repaint {
                    continue;
                }
                *needs_repaint = false;
                if let Some(surface) = surface {
                    surface.fill(tiny_skia::Color::TRANSPARENT);
                    paint(id, surface);
                }
            }
        }

        self.framebuffer.fill(self.backdrop.to_color());

        for &id in &self.tree {
            let Some(slot) = self.slots.get(id.0).and_then(Option::as_ref) else {
                continue;
            };
            let rect = slot.rect;
            if rect.is_empty() {
                continue;
            }

            match &slot.content {
                SlotContent::Image { image } => {
                    if let Some(image) = image {
                        // Center the bitmap in its slot
                        let x = rect.x + (rect.width as i32 - image.width() as i32) / 2;
                        let y = rect.y + (rect.height as i32 - image.height() as i32) / 2;
                        self.framebuffer.draw_pixmap(
                            x,
                            y,
                            image.as_ref(),
                            &PixmapPaint::default(),
                            Transform::identity(),
                            None,
                        );
                    }
                }
                SlotContent::Text { style, text, .. } => {
                    if let Some(font) = &style.font {
                        if !style.color.is_clear() {
                            font.rasterize(
                                &mut self.framebuffer,
                                text,
                                style.size,
                                style.color.rgb(),
                                rect,
                            );
                        }
                    }
                }
                SlotContent::Canvas {
                    surface: Some(surface),
                    ..
                } => {
                    self.framebuffer.draw_pixmap(
                        rect.x,
                        rect.y,
                        surface.as_ref(),
                        &PixmapPaint::default(),
                        Transform::identity(),
                        None,
                    );
                }
                SlotContent::Canvas { surface: None, .. } => {}
            }
        }

        self.frame += 1;
        self.framebuffer.data()
    }

    pub fn pixels(&self) -> &[u8] {
        self.framebuffer.data()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.framebuffer
            .save_png(path)
            .map_err(|e| anyhow::anyhow!("Failed to save PNG: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i32, y: i32, width: u32, height: u32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_dirty_marks_coalesce_into_one_paint() {
        let mut comp = Compositor::new(20, 20).unwrap();
        let canvas = comp.create_canvas(rect(0, 0, 10, 10));
        comp.attach(canvas);

        comp.mark_dirty(canvas);
        comp.mark_dirty(canvas);
        assert!(comp.needs_repaint(canvas));

        let mut paints = 0;
        comp.composite(|_, _| paints += 1);
        assert_eq!(paints, 1);
        assert!(!comp.needs_repaint(canvas));

        comp.composite(|_, _| paints += 1);
        assert_eq!(paints, 1);
    }

    #[test]
    fn test_canvas_paint_reaches_framebuffer() {
        let mut comp = Compositor::new(4, 4).unwrap();
        let canvas = comp.create_canvas(rect(2, 2, 2, 2));
        comp.attach(canvas);
        comp.mark_dirty(canvas);
        comp.composite(|_, surface| surface.fill(tiny_skia::Color::WHITE));

        let px = |x: usize, y: usize| comp.pixels()[(y * 4 + x) * 4];
        assert_eq!(px(3, 3), 255);
        assert_eq!(px(0, 0), 0);
    }

    #[test]
    fn test_zero_size_canvas_never_paints() {
        let mut comp = Compositor::new(10, 10).unwrap();
        let canvas = comp.create_canvas(rect(0, 0, 0, 10));
        comp.attach(canvas);
        comp.mark_dirty(canvas);
        let mut paints = 0;
        comp.composite(|_, _| paints += 1);
        assert_eq!(paints, 0);
    }

    #[test]
    fn test_oversized_canvas_never_paints() {
        let mut comp = Compositor::new(144, 168).unwrap();
        let canvas = comp.create_canvas(rect(-65_000, -65_000, 131_076, 131_076));
        comp.attach(canvas);
        comp.mark_dirty(canvas);
        let mut paints = 0;
        comp.composite(|_, _| paints += 1);
        assert_eq!(paints, 0);
    }

    #[test]
    fn test_tree_order_and_destroy() {
        let mut comp = Compositor::new(10, 10).unwrap();
        let a = comp.create_image(rect(0, 0, 10, 10), None);
        let b = comp.create_canvas(rect(0, 0, 5, 5));
        comp.attach(a);
        comp.attach(b);
        comp.attach(a);
        assert_eq!(comp.tree(), &[a, b]);

        assert!(comp.destroy(a));
        assert!(!comp.destroy(a));
        assert_eq!(comp.tree(), &[b]);
        assert_eq!(comp.live_slots(), 1);
    }

    #[test]
    fn test_set_text_counts_writes() {
        let mut comp = Compositor::new(10, 10).unwrap();
        let id = comp.create_text(
            rect(0, 0, 10, 10),
            TextStyle {
                font: None,
                size: 12.0,
                color: PaletteColor::WHITE,
            },
        );
        comp.set_text(id, "12:00");
        comp.set_text(id, "12:01");
        assert_eq!(comp.text(id), Some("12:01"));
        assert_eq!(comp.text_writes(id), 2);

        comp.destroy(id);
        comp.set_text(id, "ignored");
        assert_eq!(comp.text_writes(id), 0);
    }

    #[test]
    fn test_image_is_centered_over_backdrop() {
        let mut comp = Compositor::new(6, 6).unwrap();
        comp.set_backdrop(PaletteColor(0xF0));
        let mut image = Pixmap::new(2, 2).unwrap();
        image.fill(tiny_skia::Color::WHITE);
        let bg = comp.create_image(rect(0, 0, 6, 6), Some(image));
        comp.attach(bg);
        comp.composite(|_, _| {});

        let px = |x: usize, y: usize| {
            let i = (y * 6 + x) * 4;
            let data = comp.pixels();
            [data[i], data[i + 1], data[i + 2]]
        };
        assert_eq!(px(2, 2), [255, 255, 255]);
        assert_eq!(px(3, 3), [255, 255, 255]);
        assert_eq!(px(0, 0), [255, 0, 0]);
    }
}
