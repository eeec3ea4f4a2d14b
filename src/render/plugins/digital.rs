/// Digital clock renderer: HH:MM in a text slot.
use chrono::NaiveDateTime;
use tracing::debug;

use crate::render::compositor::Compositor;
use crate::render::plugins::{RenderState, TextSlot, TickRenderer, TimeText, format_bounded};

pub fn format_time(now: &NaiveDateTime, hour24: bool) -> TimeText {
    format_bounded(now, if hour24 { "%H:%M" } else { "%I:%M" })
}

pub struct DigitalRenderer {
    enabled: bool,
    pub slot: TextSlot,
}

impl DigitalRenderer {
    pub fn new(enabled: bool, slot: TextSlot) -> Self {
        Self { enabled, slot }
    }
}

impl TickRenderer for DigitalRenderer {
    fn update(&mut self, state: &RenderState, compositor: &mut Compositor) {
        if !self.enabled {
            return;
        }
        compositor.set_text(self.slot.id, &state.time_text);
        debug!("Digital time {}", state.time_text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::model::TextElement;
    use crate::face::palette::PaletteColor;
    use crate::platform::testing::{CountingFonts, at};
    use crate::render::fonts::FontProvider;
    use crate::render::layout::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn renderer(enabled: bool, compositor: &mut Compositor) -> DigitalRenderer {
        let fonts: Rc<RefCell<dyn FontProvider>> = Rc::new(RefCell::new(CountingFonts::default()));
        let element = TextElement {
            enabled,
            font_size: 42,
            color: PaletteColor::WHITE,
            offset: Default::default(),
            font: Default::default(),
        };
        let rect = Rect {
            x: 0,
            y: 0,
            width: 144,
            height: 46,
        };
        DigitalRenderer::new(enabled, TextSlot::create(&element, "FONT_TIME", rect, &fonts, compositor))
    }

    #[test]
    fn test_format_24h_and_12h() {
        let now = at(2024, 3, 9, 13, 5, 0);
        assert_eq!(format_time(&now, true).as_str(), "13:05");
        assert_eq!(format_time(&now, false).as_str(), "01:05");
    }

    #[test]
    fn test_midnight_in_12h_is_twelve() {
        assert_eq!(format_time(&at(2024, 3, 9, 0, 7, 0), false).as_str(), "12:07");
    }

    #[test]
    fn test_update_pushes_text() {
        let mut comp = Compositor::new(144, 168).unwrap();
        let mut digital = renderer(true, &mut comp);
        let state = RenderState::capture(&at(2024, 3, 9, 13, 5, 0), true, "");
        digital.update(&state, &mut comp);
        assert_eq!(comp.text(digital.slot.id), Some("13:05"));
        assert_eq!(comp.text_writes(digital.slot.id), 1);
    }

    #[test]
    fn test_disabled_never_writes() {
        let mut comp = Compositor::new(144, 168).unwrap();
        let mut digital = renderer(false, &mut comp);
        let state = RenderState::capture(&at(2024, 3, 9, 13, 5, 0), true, "");
        digital.update(&state, &mut comp);
        digital.update(&state, &mut comp);
        assert_eq!(comp.text_writes(digital.slot.id), 0);
    }
}
