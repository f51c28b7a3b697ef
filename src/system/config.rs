//! Watch configuration
//!
//! There is no settings storage on the watch, the values are baked in by the
//! build script (`WATCH_UTC_OFFSET`, `WATCH_CLOCK_24H`).

use chrono::{Duration, NaiveDateTime};

mod build {
    include!(concat!(env!("OUT_DIR"), "/build_config.rs"));
}

/// Build time as seconds since the Unix epoch
pub const BUILD_EPOCH: i64 = build::UTC_EPOCH;

/// How hours are rendered on the watchface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockStyle {
    /// `1`..`12`, blank padded, no AM/PM marker
    TwelveHour,
    /// `00`..`23`, zero padded
    TwentyFourHour,
}

impl ClockStyle {
    /// Map the platform's "24h style" flag to a clock style
    pub const fn from_24h(is_24h: bool) -> Self {
        if is_24h {
            Self::TwentyFourHour
        } else {
            Self::TwelveHour
        }
    }

    pub const fn is_24h(self) -> bool {
        matches!(self, Self::TwentyFourHour)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchConfig {
    /// Seconds east of UTC
    pub utc_offset: i32,
    /// 12/24 hour display preference
    pub clock_style: ClockStyle,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            utc_offset: 0,
            clock_style: ClockStyle::TwentyFourHour,
        }
    }
}

impl WatchConfig {
    /// Configuration chosen at build time
    pub const fn from_build() -> Self {
        Self {
            utc_offset: build::UTC_OFFSET,
            clock_style: ClockStyle::from_24h(build::CLOCK_24H),
        }
    }

    /// Convert a UTC wall-clock time to local time
    pub fn to_local(&self, utc: NaiveDateTime) -> NaiveDateTime {
        utc + Duration::seconds(self.utc_offset as i64)
    }
}
