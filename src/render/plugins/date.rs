/// Date renderer: the configured strftime format in a text slot.
use chrono::NaiveDateTime;

use crate::render::compositor::Compositor;
use crate::render::plugins::{DateText, RenderState, TextSlot, TickRenderer, format_bounded};

pub fn format_date(now: &NaiveDateTime, format: &str) -> DateText {
    format_bounded(now, format)
}

pub struct DateRenderer {
    enabled: bool,
    pub slot: TextSlot,
}

impl DateRenderer {
    pub fn new(enabled: bool, slot: TextSlot) -> Self {
        Self { enabled, slot }
    }
}

impl TickRenderer for DateRenderer {
    fn update(&mut self, state: &RenderState, compositor: &mut Compositor) {
        if self.enabled {
            compositor.set_text(self.slot.id, &state.date_text);
        }
    }
}
