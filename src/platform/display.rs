/// Display metrics for the supported watch platforms.
/// Replaces per-shape conditional compilation with a runtime value.
use crate::render::layout::Point;

/// Vertical nudge applied to the center of round displays, whose rim crops
/// the top of the screen.
pub const ROUND_Y_OFFSET: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayShape {
    Rectangular,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMetrics {
    pub width: u32,
    pub height: u32,
    pub shape: DisplayShape,
    /// False on black-and-white panels
    pub color: bool,
}

impl DisplayMetrics {
    pub fn rectangular(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shape: DisplayShape::Rectangular,
            color: true,
        }
    }

    pub fn round(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shape: DisplayShape::Round,
            color: true,
        }
    }

    /// The point every configured offset is measured from.
    pub fn center(&self) -> Point {
        let y_offset = match self.shape {
            DisplayShape::Round => ROUND_Y_OFFSET,
            DisplayShape::Rectangular => 0,
        };
        Point {
            x: self.width as i32 / 2,
            y: self.height as i32 / 2 + y_offset,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Platform {
    Aplite,
    #[default]
    Basalt,
    Chalk,
    Diorite,
    Emery,
}

impl Platform {
    pub fn metrics(self) -> DisplayMetrics {
        match self {
            Platform::Aplite | Platform::Diorite => DisplayMetrics {
                color: false,
                ..DisplayMetrics::rectangular(144, 168)
            },
            Platform::Basalt => DisplayMetrics::rectangular(144, 168),
            Platform::Chalk => DisplayMetrics::round(180, 180),
            Platform::Emery => DisplayMetrics::rectangular(200, 228),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Platform::Aplite => "aplite",
            Platform::Basalt => "basalt",
            Platform::Chalk => "chalk",
            Platform::Diorite => "diorite",
            Platform::Emery => "emery",
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aplite" => Ok(Platform::Aplite),
            "basalt" => Ok(Platform::Basalt),
            "chalk" => Ok(Platform::Chalk),
            "diorite" => Ok(Platform::Diorite),
            "emery" => Ok(Platform::Emery),
            _ => Err(format!("Unknown platform {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_center() {
        let metrics = Platform::Basalt.metrics();
        assert_eq!(metrics.center(), Point { x: 72, y: 84 });
    }

    #[test]
    fn test_round_center_is_nudged_down() {
        let metrics = Platform::Chalk.metrics();
        assert_eq!(metrics.shape, DisplayShape::Round);
        assert_eq!(metrics.center(), Point { x: 90, y: 90 + ROUND_Y_OFFSET });
    }

    #[test]
    fn test_black_and_white_platforms() {
        assert!(!Platform::Aplite.metrics().color);
        assert!(!Platform::Diorite.metrics().color);
        assert!(Platform::Emery.metrics().color);
        assert_eq!("CHALK".parse::<Platform>(), Ok(Platform::Chalk));
        assert!("pebble".parse::<Platform>().is_err());
    }
}
