/// Tick scheduler: decides when the wall clock has crossed into a new
/// minute (or second) and the face must update.
use chrono::NaiveDateTime;

use crate::face::model::WatchFaceConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickUnit {
    Second,
    Minute,
}

impl TickUnit {
    /// Seconds only matter when a second hand is actually drawn.
    pub fn for_config(config: &WatchFaceConfig) -> Self {
        if config.analog.enabled && config.analog.seconds_enabled {
            TickUnit::Second
        } else {
            TickUnit::Minute
        }
    }

    fn period_secs(self) -> i64 {
        match self {
            TickUnit::Second => 1,
            TickUnit::Minute => 60,
        }
    }
}

pub struct TickScheduler {
    unit: TickUnit,
    last: i64,
}

impl TickScheduler {
    /// Subscribe at `now`; the caller performs the initial update itself.
    pub fn subscribe(unit: TickUnit, now: &NaiveDateTime) -> Self {
        Self {
            unit,
            last: Self::bucket(unit, now),
        }
    }

    pub fn unit(&self) -> TickUnit {
        self.unit
    }

    fn bucket(unit: TickUnit, now: &NaiveDateTime) -> i64 {
        now.and_utc().timestamp().div_euclid(unit.period_secs())
    }

    /// True once per unit boundary crossed since the last tick. Clock
    /// jumps in either direction also count as a tick.
    pub fn due(&mut self, now: &NaiveDateTime) -> bool {
        let bucket = Self::bucket(self.unit, now);
        if bucket == self.last {
            return false;
        }
        self.last = bucket;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::at;

    #[test]
    fn test_unit_selection() {
        let mut config = WatchFaceConfig::default();
        for (enabled, seconds, expected) in [
            (true, true, TickUnit::Second),
            (true, false, TickUnit::Minute),
            (false, true, TickUnit::Minute),
            (false, false, TickUnit::Minute),
        ] {
            config.analog.enabled = enabled;
            config.analog.seconds_enabled = seconds;
            assert_eq!(TickUnit::for_config(&config), expected);
        }
    }

    #[test]
    fn test_minute_ticks_on_boundary() {
        let mut sched = TickScheduler::subscribe(TickUnit::Minute, &at(2024, 5, 1, 10, 0, 10));
        assert!(!sched.due(&at(2024, 5, 1, 10, 0, 10)));
        assert!(!sched.due(&at(2024, 5, 1, 10, 0, 59)));
        assert!(sched.due(&at(2024, 5, 1, 10, 1, 0)));
        assert!(!sched.due(&at(2024, 5, 1, 10, 1, 30)));
    }

    #[test]
    fn test_second_ticks_every_second() {
        let mut sched = TickScheduler::subscribe(TickUnit::Second, &at(2024, 5, 1, 10, 0, 10));
        assert!(sched.due(&at(2024, 5, 1, 10, 0, 11)));
        assert!(!sched.due(&at(2024, 5, 1, 10, 0, 11)));
        assert!(sched.due(&at(2024, 5, 1, 10, 0, 12)));
    }

    #[test]
    fn test_clock_jump_back_ticks() {
        let mut sched = TickScheduler::subscribe(TickUnit::Minute, &at(2024, 5, 1, 10, 0, 0));
        assert!(sched.due(&at(2024, 5, 1, 9, 0, 0)));
    }
}
