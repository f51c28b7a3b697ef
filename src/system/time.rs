//! Time keeping module for PineTime

use core::time::Duration;

use chrono::{DateTime, NaiveDateTime, TimeDelta};

use super::config::{ClockStyle, WatchConfig};

/// Source of the ambient wall-clock time and hour format
pub trait Clock {
    /// Current local time
    fn now(&self) -> NaiveDateTime;

    /// 12/24 hour display preference
    fn clock_style(&self) -> ClockStyle;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }

    fn clock_style(&self) -> ClockStyle {
        (**self).clock_style()
    }
}

/// Wall-clock time valid at a given uptime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeReference {
    /// Clock time (UTC)
    time: NaiveDateTime,
    /// Related system uptime
    uptime: Duration,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: NaiveDateTime::default(),
            uptime: Duration::ZERO,
        }
    }
}

impl TimeReference {
    /// Create new time reference from a UTC time
    pub fn from_datetime(time: NaiveDateTime, uptime: Duration) -> Self {
        Self { time, uptime }
    }

    /// Create new time reference from seconds since the Unix epoch.
    ///
    /// Returns `None` for timestamps chrono cannot represent.
    pub fn from_timestamp(secs: i64, uptime: Duration) -> Option<Self> {
        let time = DateTime::from_timestamp(secs, 0)?.naive_utc();
        Some(Self { time, uptime })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    /// Initialize time measurement with a known reference
    pub fn init(reference: TimeReference) -> Self {
        Self { reference }
    }

    /// UTC time at the given uptime.
    ///
    /// Uptimes before the reference are clamped to the reference time.
    pub fn time_at(&self, uptime: Duration) -> NaiveDateTime {
        let elapsed = uptime.saturating_sub(self.reference.uptime);
        let elapsed = TimeDelta::from_std(elapsed).unwrap_or(TimeDelta::MAX);
        self.reference
            .time
            .checked_add_signed(elapsed)
            .unwrap_or(NaiveDateTime::MAX)
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        debug!(
            "Time reference set to {} s since epoch",
            reference.time.and_utc().timestamp()
        );
        self.reference = reference;
    }
}

/// A clock driven by a [`TimeManager`] and an uptime source
#[derive(Debug, Clone, Copy)]
pub struct ManagedClock<F> {
    manager: TimeManager,
    config: WatchConfig,
    uptime: F,
}

impl<F> ManagedClock<F>
where
    F: Fn() -> Duration,
{
    pub fn new(manager: TimeManager, config: WatchConfig, uptime: F) -> Self {
        Self {
            manager,
            config,
            uptime,
        }
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        self.manager.set_time(reference);
    }
}

impl<F> Clock for ManagedClock<F>
where
    F: Fn() -> Duration,
{
    fn now(&self) -> NaiveDateTime {
        self.config.to_local(self.manager.time_at((self.uptime)()))
    }

    fn clock_style(&self) -> ClockStyle {
        self.config.clock_style
    }
}
