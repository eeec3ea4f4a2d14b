/// Binary config blob codec.
///
/// The blob is a little-endian, versioned, length-prefixed record:
/// `[magic: 4][version: u16][payload_len: u16][payload]`. Every scalar in
/// the payload is 16 bits wide and strings occupy a fixed 32-byte slot
/// holding a NUL-terminated value.
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};
use thiserror::Error;
use tracing::{debug, info};

use crate::face::model::{
    AnalogBlock, BackgroundBlock, DateBlock, FontSource, LabelBlock, Offset, STRING_CAPACITY,
    TextElement, WatchFaceConfig,
};
use crate::face::palette::PaletteColor;
use crate::platform::assets::{RESOURCE_DATA, ResourceStore};

pub const MAGIC: [u8; 4] = *b"WFCB";
pub const VERSION: u16 = 1;
pub const HEADER_LEN: usize = 8;

const BACKGROUND_LEN: usize = 5 * 2;
const ANALOG_LEN: usize = 8 * 2;
const TEXT_ELEMENT_LEN: usize = 6 * 2 + STRING_CAPACITY;
/// Exact payload size for `VERSION`
pub const PAYLOAD_LEN: usize =
    BACKGROUND_LEN + ANALOG_LEN + TEXT_ELEMENT_LEN + 2 * (TEXT_ELEMENT_LEN + STRING_CAPACITY);

const FONT_MODE_CUSTOM: u16 = 0;
const FONT_MODE_SYSTEM: u16 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config blob is {0} bytes, too short for the header")]
    MissingHeader(usize),

    #[error("bad config magic {0:02x?}")]
    BadMagic([u8; 4]),

    #[error("unsupported config version {0}")]
    UnsupportedVersion(u16),

    #[error("config header declares {declared} payload bytes, schema needs {expected}")]
    DeclaredLength { declared: usize, expected: usize },

    #[error("config payload is {actual} bytes, expected {expected}")]
    SizeMismatch { actual: usize, expected: usize },

    #[error("field '{0}' is not NUL-terminated within its 32-byte slot")]
    Unterminated(&'static str),

    #[error("field '{0}' is not valid UTF-8")]
    InvalidUtf8(&'static str),

    #[error("field '{field}' has unknown font mode {mode}")]
    FontMode { field: &'static str, mode: u16 },

    #[error("failed to read config resource: {0}")]
    Io(#[from] std::io::Error),
}

/// Read the `DATA` resource and decode it.
pub fn load(resources: &dyn ResourceStore) -> Result<WatchFaceConfig, ConfigError> {
    let blob = resources.read_raw(RESOURCE_DATA)?;
    let config = decode(&blob)?;
    info!("Loaded face config ({} bytes)", blob.len());
    Ok(config)
}

pub fn decode(blob: &[u8]) -> Result<WatchFaceConfig, ConfigError> {
    if blob.len() < HEADER_LEN {
        return Err(ConfigError::MissingHeader(blob.len()));
    }

    let mut cursor = Cursor::new(blob);
    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(ConfigError::BadMagic(magic));
    }

    let version = cursor.read_u16::<LittleEndian>()?;
    if version != VERSION {
        return Err(ConfigError::UnsupportedVersion(version));
    }

    let declared = cursor.read_u16::<LittleEndian>()? as usize;
    if declared != PAYLOAD_LEN {
        return Err(ConfigError::DeclaredLength {
            declared,
            expected: PAYLOAD_LEN,
        });
    }

    let actual = blob.len() - HEADER_LEN;
    if actual != PAYLOAD_LEN {
        return Err(ConfigError::SizeMismatch {
            actual,
            expected: PAYLOAD_LEN,
        });
    }

    let mut r = FieldReader { cursor };

    let background = BackgroundBlock {
        color: r.color()?,
        offset: r.offset()?,
        width: r.u16()?,
        height: r.u16()?,
    };

    let analog = AnalogBlock {
        enabled: r.flag()?,
        offset: r.offset()?,
        radius: r.u16()?,
        hand_width: r.u16()?,
        seconds_enabled: r.flag()?,
        pips_enabled: r.flag()?,
        hand_color: r.color()?,
    };

    let digital = r.text_element("digital_font")?;

    let date = DateBlock {
        element: r.text_element("date_font")?,
        format: r.string("date_format")?,
    };

    let text = LabelBlock {
        element: r.text_element("text_font")?,
        label: r.string("text_label")?,
    };

    debug!(
        "Decoded config: analog={} digital={} date={} text={}",
        analog.enabled, digital.enabled, date.element.enabled, text.element.enabled
    );

    Ok(WatchFaceConfig {
        background,
        analog,
        digital,
        date,
        text,
    })
}

pub fn encode(config: &WatchFaceConfig) -> Result<Vec<u8>, ConfigError> {
    let mut w = FieldWriter {
        buf: Vec::with_capacity(HEADER_LEN + PAYLOAD_LEN),
    };

    w.buf.write_all(&MAGIC)?;
    w.u16(VERSION)?;
    w.u16(PAYLOAD_LEN as u16)?;

    let bg = &config.background;
    w.color(bg.color)?;
    w.offset(bg.offset)?;
    w.u16(bg.width)?;
    w.u16(bg.height)?;

    let analog = &config.analog;
    w.flag(analog.enabled)?;
    w.offset(analog.offset)?;
    w.u16(analog.radius)?;
    w.u16(analog.hand_width)?;
    w.flag(analog.seconds_enabled)?;
    w.flag(analog.pips_enabled)?;
    w.color(analog.hand_color)?;

    w.text_element(&config.digital)?;
    w.text_element(&config.date.element)?;
    w.string(&config.date.format)?;
    w.text_element(&config.text.element)?;
    w.string(&config.text.label)?;

    Ok(w.buf)
}

struct FieldReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl FieldReader<'_> {
    fn u16(&mut self) -> Result<u16, ConfigError> {
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    fn flag(&mut self) -> Result<bool, ConfigError> {
        Ok(self.u16()? != 0)
    }

    fn color(&mut self) -> Result<PaletteColor, ConfigError> {
        Ok(PaletteColor::from_wire(self.u16()?))
    }

    fn offset(&mut self) -> Result<Offset, ConfigError> {
        let x = self.cursor.read_i16::<LittleEndian>()?;
        let y = self.cursor.read_i16::<LittleEndian>()?;
        Ok(Offset { x, y })
    }

    fn string(&mut self, field: &'static str) -> Result<String, ConfigError> {
        let mut raw = [0u8; STRING_CAPACITY];
        self.cursor.read_exact(&mut raw)?;
        let end = raw
            .iter()
            .position(|&b| b == 0)
            .ok_or(ConfigError::Unterminated(field))?;
        std::str::from_utf8(&raw[..end])
            .map(str::to_string)
            .map_err(|_| ConfigError::InvalidUtf8(field))
    }

    fn text_element(&mut self, font_field: &'static str) -> Result<TextElement, ConfigError> {
        let enabled = self.flag()?;
        let font_size = self.u16()?;
        let color = self.color()?;
        let offset = self.offset()?;
        let mode = self.u16()?;
        let name = self.string(font_field)?;
        let font = match mode {
            FONT_MODE_CUSTOM => FontSource::Custom(name),
            FONT_MODE_SYSTEM => FontSource::System(name),
            mode => {
                return Err(ConfigError::FontMode {
                    field: font_field,
                    mode,
                });
            }
        };
        Ok(TextElement {
            enabled,
            font_size,
            color,
            offset,
            font,
        })
    }
}

struct FieldWriter {
    buf: Vec<u8>,
}

impl FieldWriter {
    fn u16(&mut self, value: u16) -> Result<(), ConfigError> {
        Ok(self.buf.write_u16::<LittleEndian>(value)?)
    }

    fn flag(&mut self, value: bool) -> Result<(), ConfigError> {
        self.u16(value as u16)
    }

    fn color(&mut self, color: PaletteColor) -> Result<(), ConfigError> {
        self.u16(color.0 as u16)
    }

    fn offset(&mut self, offset: Offset) -> Result<(), ConfigError> {
        self.buf.write_i16::<LittleEndian>(offset.x)?;
        self.buf.write_i16::<LittleEndian>(offset.y)?;
        Ok(())
    }

    /// Writes at most `STRING_CAPACITY - 1` bytes, cut on a char boundary.
    fn string(&mut self, value: &str) -> Result<(), ConfigError> {
        let mut end = value.len().min(STRING_CAPACITY - 1);
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        let mut raw = [0u8; STRING_CAPACITY];
        raw[..end].copy_from_slice(&value.as_bytes()[..end]);
        Ok(self.buf.write_all(&raw)?)
    }

    fn text_element(&mut self, element: &TextElement) -> Result<(), ConfigError> {
        self.flag(element.enabled)?;
        self.u16(element.font_size)?;
        self.color(element.color)?;
        self.offset(element.offset)?;
        let (mode, name) = match &element.font {
            FontSource::Custom(name) => (FONT_MODE_CUSTOM, name),
            FontSource::System(name) => (FONT_MODE_SYSTEM, name),
        };
        self.u16(mode)?;
        self.string(name)
    }
}
