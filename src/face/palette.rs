/// 64-colour display palette.
///
/// A palette index packs 2 bits per channel as `aarrggbb`; each 2-bit level
/// expands to 0x00, 0x55, 0xAA or 0xFF.
use tiny_skia::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteColor(pub u8);

impl PaletteColor {
    pub const CLEAR: PaletteColor = PaletteColor(0x00);
    pub const BLACK: PaletteColor = PaletteColor(0xC0);
    pub const WHITE: PaletteColor = PaletteColor(0xFF);

    /// Decode from a 16-bit wire field; the upper byte is ignored.
    pub fn from_wire(value: u16) -> Self {
        PaletteColor((value & 0xFF) as u8)
    }

    /// Nearest palette entry for an opaque RGB colour
    pub fn nearest(r: u8, g: u8, b: u8) -> Self {
        let level = |v: u8| (v as u16 + 42) / 85;
        let packed = (3 << 6) | (level(r) << 4) | (level(g) << 2) | level(b);
        PaletteColor(packed as u8)
    }

    /// Parse `#RRGGBB` and map it onto the palette
    pub fn from_hex(color: &str) -> Option<Self> {
        parse_hex(color).map(|(r, g, b)| Self::nearest(r, g, b))
    }

    fn channel(self, shift: u8) -> u8 {
        ((self.0 >> shift) & 0b11) * 0x55
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (self.channel(4), self.channel(2), self.channel(0))
    }

    pub fn alpha(self) -> u8 {
        self.channel(6)
    }

    pub fn is_clear(self) -> bool {
        self.alpha() == 0
    }

    pub fn to_color(self) -> Color {
        let (r, g, b) = self.rgb();
        Color::from_rgba8(r, g, b, self.alpha())
    }
}

/// Parse a hex color string (#RRGGBB) to (r, g, b)
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let s = color.trim().trim_start_matches('#');
    if s.len() != 6 || !s.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_snaps_to_levels() {
        assert_eq!(PaletteColor::nearest(0, 0, 0), PaletteColor::BLACK);
        assert_eq!(PaletteColor::nearest(255, 255, 255), PaletteColor::WHITE);
        // 0x30 rounds up to 0x55, 0x20 rounds down to 0x00
        assert_eq!(PaletteColor::nearest(0x30, 0x20, 0xC0).rgb(), (0x55, 0x00, 0xAA));
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(PaletteColor::from_hex("#0055AA"), Some(PaletteColor(0b1100_0110)));
        assert_eq!(PaletteColor::from_hex("ffffff"), Some(PaletteColor::WHITE));
        assert_eq!(PaletteColor::from_hex("#fff"), None);
        assert_eq!(PaletteColor::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_wire_upper_byte_ignored() {
        assert_eq!(PaletteColor::from_wire(0xAB_FF), PaletteColor::WHITE);
        assert!(PaletteColor::from_wire(0x0F).is_clear());
    }
}
