/// XML face description.
///
/// A `<face>` document is the authoring format for a face; it is turned into
/// a `WatchFaceConfig` for one platform and can then be run directly or
/// encoded into a blob. Elements that are left out are disabled.
use anyhow::{Context, Result};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::face::model::{FontSource, Offset, STRING_CAPACITY, TextElement, WatchFaceConfig};
use crate::face::palette::PaletteColor;

const SYSTEM_FONT_PREFIX: &str = "system:";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename = "face")]
pub struct FaceDescription {
    pub background: Option<BackgroundDesc>,
    pub analogue: Option<AnalogueDesc>,
    pub digital: Option<TextDesc>,
    pub date: Option<TextDesc>,
    pub text: Option<TextDesc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackgroundDesc {
    #[serde(rename = "@colour")]
    pub colour: Option<String>,
    #[serde(rename = "@bwColour")]
    pub bw_colour: Option<String>,
    #[serde(rename = "@x", default)]
    pub x: i16,
    #[serde(rename = "@y", default)]
    pub y: i16,
    #[serde(rename = "@width", default)]
    pub width: u16,
    #[serde(rename = "@height", default)]
    pub height: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalogueDesc {
    #[serde(rename = "@enabled", default = "default_true")]
    pub enabled: bool,
    #[serde(rename = "@x", default)]
    pub x: i16,
    #[serde(rename = "@y", default)]
    pub y: i16,
    #[serde(rename = "@radius")]
    pub radius: Option<u16>,
    #[serde(rename = "@handWidth")]
    pub hand_width: Option<u16>,
    #[serde(rename = "@secondHand", default)]
    pub second_hand: bool,
    #[serde(rename = "@pips", default = "default_true")]
    pub pips: bool,
    #[serde(rename = "@handsColour")]
    pub hands_colour: Option<String>,
    #[serde(rename = "@bwHandsColour")]
    pub bw_hands_colour: Option<String>,
}

/// `<digital>`, `<date>` and `<text>` share one shape; `format` only means
/// something on `<date>` and `text` only on `<text>`.
#[derive(Debug, Clone, Deserialize)]
pub struct TextDesc {
    #[serde(rename = "@enabled", default = "default_true")]
    pub enabled: bool,
    #[serde(rename = "@fontSize")]
    pub font_size: Option<u16>,
    #[serde(rename = "@colour")]
    pub colour: Option<String>,
    #[serde(rename = "@bwColour")]
    pub bw_colour: Option<String>,
    #[serde(rename = "@x", default)]
    pub x: i16,
    #[serde(rename = "@y", default)]
    pub y: i16,
    #[serde(rename = "@font")]
    pub font: Option<String>,
    #[serde(rename = "@format")]
    pub format: Option<String>,
    #[serde(rename = "@text")]
    pub text: Option<String>,
}

fn default_true() -> bool {
    true
}

pub fn parse_face_file(path: &Path) -> Result<FaceDescription> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read face description: {}", path.display()))?;
    parse_face_xml(&xml)
}

pub fn parse_face_xml(xml: &str) -> Result<FaceDescription> {
    let face: FaceDescription = from_str(xml.trim()).context("Failed to parse <face> XML")?;
    info!(
        "Parsed face: analogue={} digital={} date={} text={}",
        face.analogue.as_ref().is_some_and(|a| a.enabled),
        face.digital.as_ref().is_some_and(|d| d.enabled),
        face.date.as_ref().is_some_and(|d| d.enabled),
        face.text.as_ref().is_some_and(|t| t.enabled),
    );
    Ok(face)
}

/// Black-and-white platforms prefer the `bw*` variant when one is given.
fn pick_colour<'a>(colour: &'a Option<String>, bw: &'a Option<String>, color_display: bool) -> Option<&'a str> {
    match bw {
        Some(bw) if !color_display => Some(bw.as_str()),
        _ => colour.as_deref(),
    }
}

fn palette(value: Option<&str>, fallback: PaletteColor, what: &str) -> Result<PaletteColor> {
    match value {
        None => Ok(fallback),
        Some(hex) => PaletteColor::from_hex(hex)
            .with_context(|| format!("Invalid {what} colour {hex:?}, expected #RRGGBB")),
    }
}

fn bounded(value: &str, what: &str) -> Result<String> {
    if value.len() >= STRING_CAPACITY {
        anyhow::bail!(
            "{what} {value:?} is {} bytes, at most {} fit",
            value.len(),
            STRING_CAPACITY - 1
        );
    }
    Ok(value.to_string())
}

fn font_source(font: Option<&str>, what: &str) -> Result<FontSource> {
    let Some(font) = font else {
        return Ok(FontSource::default());
    };
    match font.strip_prefix(SYSTEM_FONT_PREFIX) {
        Some(name) => Ok(FontSource::System(bounded(name, what)?)),
        None => Ok(FontSource::Custom(bounded(font, what)?)),
    }
}

impl TextDesc {
    fn element(&self, base: &TextElement, color_display: bool, what: &str) -> Result<TextElement> {
        Ok(TextElement {
            enabled: self.enabled,
            font_size: self.font_size.unwrap_or(base.font_size),
            color: palette(
                pick_colour(&self.colour, &self.bw_colour, color_display),
                base.color,
                what,
            )?,
            offset: Offset { x: self.x, y: self.y },
            font: font_source(self.font.as_deref(), &format!("{what} font"))?,
        })
    }
}

impl FaceDescription {
    /// Resolve into a config for a display that is colour or black-and-white.
    pub fn into_config(self, color_display: bool) -> Result<WatchFaceConfig> {
        let mut config = WatchFaceConfig::default();

        if let Some(bg) = &self.background {
            config.background.color = palette(
                pick_colour(&bg.colour, &bg.bw_colour, color_display),
                config.background.color,
                "background",
            )?;
            config.background.offset = Offset { x: bg.x, y: bg.y };
            config.background.width = bg.width;
            config.background.height = bg.height;
        }

        match &self.analogue {
            Some(a) => {
                let analog = &mut config.analog;
                analog.enabled = a.enabled;
                analog.offset = Offset { x: a.x, y: a.y };
                analog.radius = a.radius.unwrap_or(analog.radius);
                analog.hand_width = a.hand_width.unwrap_or(analog.hand_width);
                analog.seconds_enabled = a.second_hand;
                analog.pips_enabled = a.pips;
                analog.hand_color = palette(
                    pick_colour(&a.hands_colour, &a.bw_hands_colour, color_display),
                    analog.hand_color,
                    "hands",
                )?;
            }
            None => config.analog.enabled = false,
        }

        match &self.digital {
            Some(d) => config.digital = d.element(&config.digital, color_display, "digital")?,
            None => config.digital.enabled = false,
        }

        if let Some(d) = &self.date {
            config.date.element = d.element(&config.date.element, color_display, "date")?;
            if let Some(format) = &d.format {
                config.date.format = bounded(format, "date format")?;
            }
        }

        if let Some(t) = &self.text {
            config.text.element = t.element(&config.text.element, color_display, "text")?;
            config.text.label = bounded(t.text.as_deref().unwrap_or_default(), "label")?;
        }

        Ok(config)
    }
}
