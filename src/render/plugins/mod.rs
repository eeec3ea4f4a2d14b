pub mod analog;
pub mod date;
pub mod digital;
pub mod text;

use chrono::{NaiveDateTime, Timelike};
use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;
use tracing::warn;

use crate::face::model::TextElement;
use crate::render::compositor::{Compositor, SlotId, TextStyle};
use crate::render::fonts::{FontLease, FontProvider};
use crate::render::layout::Rect;

/// Formatted time, at most 7 visible characters
pub type TimeText = heapless::String<7>;
/// Formatted date, at most 15 visible characters
pub type DateText = heapless::String<15>;

/// Per-tick snapshot handed to every renderer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderState {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub time_text: TimeText,
    pub date_text: DateText,
}

impl RenderState {
    pub fn capture(now: &NaiveDateTime, hour24: bool, date_format: &str) -> Self {
        Self {
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
            time_text: digital::format_time(now, hour24),
            date_text: date::format_date(now, date_format),
        }
    }
}

/// A renderer that reacts to scheduler ticks
pub trait TickRenderer {
    fn update(&mut self, state: &RenderState, compositor: &mut Compositor);
}

/// strftime into a fixed buffer, cutting at the buffer's capacity.
/// Invalid formats produce an empty string.
pub fn format_bounded<const N: usize>(now: &NaiveDateTime, format: &str) -> heapless::String<N> {
    let mut full = String::new();
    if write!(full, "{}", now.format(format)).is_err() {
        warn!("Invalid time format {:?}", format);
        full.clear();
    }

    let mut out = heapless::String::new();
    for c in full.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// A text slot plus the font it was created with
pub struct TextSlot {
    pub id: SlotId,
    font: Option<FontLease>,
}

impl TextSlot {
    pub fn create(
        element: &TextElement,
        default_font: &str,
        rect: Rect,
        fonts: &Rc<RefCell<dyn FontProvider>>,
        compositor: &mut Compositor,
    ) -> Self {
        let font = FontLease::acquire(&element.font, default_font, fonts);
        let id = compositor.create_text(
            rect,
            TextStyle {
                font: font.as_ref().map(|lease| lease.font().clone()),
                size: element.font_size as f32,
                color: element.color,
            },
        );
        Self { id, font }
    }

    /// Destroy the slot, then drop the font lease.
    pub fn release(self, compositor: &mut Compositor) {
        compositor.destroy(self.id);
        drop(self.font);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::at;

    #[test]
    fn test_capture_state() {
        let state = RenderState::capture(&at(2020, 1, 1, 18, 30, 12), false, "%d.%m");
        assert_eq!((state.hour, state.minute, state.second), (18, 30, 12));
        assert_eq!(state.time_text.as_str(), "06:30");
        assert_eq!(state.date_text.as_str(), "01.01");
    }

    #[test]
    fn test_format_bounded_truncates() {
        let now = at(2021, 9, 15, 9, 0, 0);
        let text: heapless::String<15> = format_bounded(&now, "%A %B %d %Y");
        assert_eq!(text.as_str(), "Wednesday Septe");
    }

    #[test]
    fn test_invalid_format_is_empty() {
        let text: heapless::String<15> = format_bounded(&at(2021, 9, 15, 9, 0, 0), "%Q %");
        assert!(text.is_empty());
    }
}
