use std::path::PathBuf;

use crate::platform::display::Platform;

/// Top-level runner configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub platform: Platform,
    pub fps: u32,
    /// Stop after this many frames (0 = run until interrupted)
    pub max_frames: u64,
    pub resource_dir: PathBuf,
    pub system_font_dir: PathBuf,
    pub hour_format: HourFormat,
    pub output_mode: OutputMode,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Save the frame as PNG whenever the face changes
    #[default]
    Png,
    /// Output raw RGBA pixels to stdout every frame (for piping)
    Raw,
}

impl std::str::FromStr for OutputMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(OutputMode::Png),
            "raw" | "stdout" => Ok(OutputMode::Raw),
            _ => Err(format!("Unknown output mode: {s}")),
        }
    }
}

/// 12/24-hour display preference, the "locale" half of the time source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HourFormat {
    Twelve,
    #[default]
    TwentyFour,
}

impl std::str::FromStr for HourFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "12" | "12h" => Ok(HourFormat::Twelve),
            "24" | "24h" => Ok(HourFormat::TwentyFour),
            _ => Err(format!("Unknown hour format: {s}")),
        }
    }
}
