//! Time and date text
//!
//! `TimeText` renders like strftime's `%H:%M` (24 hour) or `%l:%M` (12 hour),
//! `DateText` like `%b %d` in the C locale.

use core::fmt;

use chrono::{Datelike, Timelike};

use crate::system::config::ClockStyle;

/// Longest text `TimeText` produces
pub const TIME_TEXT_MAX_LEN: usize = 5;
/// Longest text `DateText` produces
pub const DATE_TEXT_MAX_LEN: usize = 6;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Three letter English month name for a zero-based month
pub fn month_abbreviation(month0: u32) -> Option<&'static str> {
    MONTH_ABBREVIATIONS.get(month0 as usize).copied()
}

/// Hour on a 12 hour clock face (1..=12)
pub const fn hour_12(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

/// Hour and minute of a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeText {
    hour: u32,
    minute: u32,
    style: ClockStyle,
}

impl TimeText {
    pub fn new<T: Timelike>(time: &T, style: ClockStyle) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
            style,
        }
    }
}

impl fmt::Display for TimeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            ClockStyle::TwentyFourHour => write!(f, "{:02}:{:02}", self.hour, self.minute),
            // No AM/PM marker: 09:00 and 21:00 both read " 9:00"
            ClockStyle::TwelveHour => write!(f, "{:>2}:{:02}", hour_12(self.hour), self.minute),
        }
    }
}

/// Month and day of a date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateText {
    month0: u32,
    day: u32,
}

impl DateText {
    pub fn new<D: Datelike>(date: &D) -> Self {
        Self {
            month0: date.month0(),
            day: date.day(),
        }
    }
}

impl fmt::Display for DateText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = month_abbreviation(self.month0).ok_or(fmt::Error)?;
        write!(f, "{} {:02}", month, self.day)
    }
}
