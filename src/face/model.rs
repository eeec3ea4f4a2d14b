/// Data model for a watch face configuration.
/// Loaded once per show and never mutated afterwards.
use crate::face::palette::PaletteColor;

/// Capacity of every bounded string field, terminator included
pub const STRING_CAPACITY: usize = 32;

/// Offset from the display center
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Offset {
    pub x: i16,
    pub y: i16,
}

/// Where a text element gets its font from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// Embedded font resource by id; empty selects the element's default
    Custom(String),
    /// Named platform font, owned by the platform
    System(String),
}

impl Default for FontSource {
    fn default() -> Self {
        FontSource::Custom(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchFaceConfig {
    pub background: BackgroundBlock,
    pub analog: AnalogBlock,
    pub digital: TextElement,
    pub date: DateBlock,
    pub text: LabelBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundBlock {
    pub color: PaletteColor,
    pub offset: Offset,
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalogBlock {
    pub enabled: bool,
    pub offset: Offset,
    pub radius: u16,
    pub hand_width: u16,
    pub seconds_enabled: bool,
    pub pips_enabled: bool,
    pub hand_color: PaletteColor,
}

/// Fields shared by the digital, date and label elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextElement {
    pub enabled: bool,
    pub font_size: u16,
    pub color: PaletteColor,
    pub offset: Offset,
    pub font: FontSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBlock {
    pub element: TextElement,
    /// strftime-style format
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelBlock {
    pub element: TextElement,
    pub label: String,
}

impl Default for WatchFaceConfig {
    /// A centered digital clock on black, used when no usable blob exists.
    fn default() -> Self {
        let hidden = TextElement {
            enabled: false,
            font_size: 24,
            color: PaletteColor::WHITE,
            offset: Offset::default(),
            font: FontSource::default(),
        };
        Self {
            background: BackgroundBlock {
                color: PaletteColor::BLACK,
                offset: Offset::default(),
                width: 0,
                height: 0,
            },
            analog: AnalogBlock {
                enabled: false,
                offset: Offset::default(),
                radius: 60,
                hand_width: 3,
                seconds_enabled: false,
                pips_enabled: true,
                hand_color: PaletteColor::WHITE,
            },
            digital: TextElement {
                enabled: true,
                font_size: 42,
                ..hidden.clone()
            },
            date: DateBlock {
                element: hidden.clone(),
                format: "%a %b %d".to_string(),
            },
            text: LabelBlock {
                element: hidden,
                label: String::new(),
            },
        }
    }
}
