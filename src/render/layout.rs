/// Layout engine: turns center-relative offsets into absolute rectangles.
///
/// Every element is placed by the same rule, applied per axis:
/// `origin = offset + center - size / 2`.
use crate::face::model::{Offset, WatchFaceConfig};
use crate::platform::display::DisplayMetrics;
use crate::render::plugins::analog::MAJOR_PIP_RADIUS;

/// Extra height given to text slots beyond the font size
pub const TEXT_PADDING: u32 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Absolute on-screen rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Origin of an element along one axis.
pub fn origin(offset: i32, center: i32, size: u32) -> i32 {
    offset + center - (size / 2) as i32
}

pub fn place(offset: Offset, center: Point, size: Size) -> Rect {
    Rect {
        x: origin(offset.x as i32, center.x, size.width),
        y: origin(offset.y as i32, center.y, size.height),
        width: size.width,
        height: size.height,
    }
}

pub fn text_size(metrics: &DisplayMetrics, font_size: u16) -> Size {
    Size {
        width: metrics.width,
        height: font_size as u32 + TEXT_PADDING,
    }
}

pub fn analog_size(radius: u16) -> Size {
    let side = 2 * radius as u32 + 2 * MAJOR_PIP_RADIUS;
    Size {
        width: side,
        height: side,
    }
}

/// Rectangles for every element, computed once at show time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceLayout {
    pub background: Rect,
    pub digital: Rect,
    pub date: Rect,
    pub text: Rect,
    pub analog: Rect,
}

impl FaceLayout {
    pub fn compute(config: &WatchFaceConfig, metrics: &DisplayMetrics) -> Self {
        let center = metrics.center();
        let bg = &config.background;
        Self {
            background: place(
                bg.offset,
                center,
                Size {
                    width: bg.width as u32,
                    height: bg.height as u32,
                },
            ),
            digital: place(
                config.digital.offset,
                center,
                text_size(metrics, config.digital.font_size),
            ),
            date: place(
                config.date.element.offset,
                center,
                text_size(metrics, config.date.element.font_size),
            ),
            text: place(
                config.text.element.offset,
                center,
                text_size(metrics, config.text.element.font_size),
            ),
            analog: place(config.analog.offset, center, analog_size(config.analog.radius)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_formula() {
        for offset in [-40, -1, 0, 7, 33] {
            for center in [0, 72, 90, 95] {
                for size in [0u32, 1, 24, 57, 180] {
                    assert_eq!(
                        origin(offset, center, size),
                        offset + center - (size / 2) as i32,
                        "offset={offset} center={center} size={size}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_place_axes_are_independent() {
        let rect = place(
            Offset { x: -10, y: 25 },
            Point { x: 72, y: 84 },
            Size {
                width: 144,
                height: 28,
            },
        );
        assert_eq!(
            rect,
            Rect {
                x: -10,
                y: 95,
                width: 144,
                height: 28
            }
        );
    }

    #[test]
    fn test_compute_layout_rectangular() {
        let metrics = DisplayMetrics::rectangular(144, 168);
        let mut config = WatchFaceConfig::default();
        config.background.width = 180;
        config.background.height = 180;
        config.digital.font_size = 42;
        config.digital.offset = Offset { x: 0, y: -30 };
        config.analog.radius = 50;
        config.analog.offset = Offset { x: 5, y: -5 };

        let layout = FaceLayout::compute(&config, &metrics);
        assert_eq!(layout.background, Rect { x: -18, y: -6, width: 180, height: 180 });
        assert_eq!(layout.digital, Rect { x: 0, y: 61 - 30, width: 144, height: 46 });
        let side = 100 + 2 * MAJOR_PIP_RADIUS;
        assert_eq!(
            layout.analog,
            Rect {
                x: 5 + 72 - (side / 2) as i32,
                y: -5 + 84 - (side / 2) as i32,
                width: side,
                height: side
            }
        );
    }

    #[test]
    fn test_compute_layout_round_uses_offset_center() {
        let metrics = DisplayMetrics::round(180, 180);
        let mut config = WatchFaceConfig::default();
        config.text.element.font_size = 20;
        config.text.element.offset = Offset { x: 0, y: 40 };

        let layout = FaceLayout::compute(&config, &metrics);
        assert_eq!(layout.text.y, 40 + 95 - 12);
        assert_eq!(layout.text.width, 180);
    }
}
