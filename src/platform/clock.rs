/// Wall-clock and 12/24-hour preference source.
use chrono::{Local, NaiveDateTime};

use crate::config::HourFormat;

pub trait TimeSource {
    /// Current local wall-clock time
    fn now(&self) -> NaiveDateTime;
    fn is_24h(&self) -> bool;
}

pub struct SystemClock {
    hour_format: HourFormat,
}

impl SystemClock {
    pub fn new(hour_format: HourFormat) -> Self {
        Self { hour_format }
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn is_24h(&self) -> bool {
        self.hour_format == HourFormat::TwentyFour
    }
}
