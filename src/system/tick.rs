//! Tick timer service
//!
//! Turns a stream of sampled times into "time unit changed" events, like a
//! hardware RTC compare interrupt would.

use chrono::{Datelike, NaiveDateTime, Timelike};

bitflags::bitflags! {
    /// Time units that changed between two samples
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TimeUnits: u8 {
        const SECOND = 1 << 0;
        const MINUTE = 1 << 1;
        const HOUR = 1 << 2;
        const DAY = 1 << 3;
        const MONTH = 1 << 4;
        const YEAR = 1 << 5;
    }
}

impl TimeUnits {
    /// Units whose value changed from `prev` to `now`.
    ///
    /// A unit counts as changed when the time truncated to that unit differs,
    /// so a change of a coarser unit always includes the finer ones.
    pub fn changed_between(prev: &NaiveDateTime, now: &NaiveDateTime) -> Self {
        let year = prev.year() != now.year();
        let month = year || prev.month() != now.month();
        let day = month || prev.day() != now.day();
        let hour = day || prev.hour() != now.hour();
        let minute = hour || prev.minute() != now.minute();
        let second = minute || prev.second() != now.second();

        let mut units = TimeUnits::empty();
        units.set(TimeUnits::YEAR, year);
        units.set(TimeUnits::MONTH, month);
        units.set(TimeUnits::DAY, day);
        units.set(TimeUnits::HOUR, hour);
        units.set(TimeUnits::MINUTE, minute);
        units.set(TimeUnits::SECOND, second);
        units
    }
}

/// Fires once each time the subscribed unit changes
#[derive(Debug, Clone)]
pub struct TickTimerService {
    /// Subscribed unit
    unit: TimeUnits,
    /// Time seen by the previous poll
    last: Option<NaiveDateTime>,
}

impl TickTimerService {
    /// Subscribe to changes of `unit`
    pub fn subscribe(unit: TimeUnits) -> Self {
        Self { unit, last: None }
    }

    /// Subscribed unit
    pub fn unit(&self) -> TimeUnits {
        self.unit
    }

    /// Feed the current time.
    ///
    /// Returns the changed units when the subscribed unit changed since the
    /// last poll. The very first poll always fires with every unit set.
    pub fn poll(&mut self, now: NaiveDateTime) -> Option<TimeUnits> {
        let changed = match self.last.replace(now) {
            None => TimeUnits::all(),
            Some(prev) => TimeUnits::changed_between(&prev, &now),
        };

        if changed.intersects(self.unit) {
            Some(changed)
        } else {
            None
        }
    }
}
