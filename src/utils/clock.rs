//! Sources of "today" for horizon checks and past-date rules.

use std::cell::Cell;

use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;

/// Supplies the current calendar date. Horizons are recomputed from it on
/// every call, so a long session sees the reachable range move forward.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Today according to the machine's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Today in a fixed IANA timezone.
#[derive(Debug, Clone, Copy)]
pub struct ZonedClock {
    tz: Tz,
}

impl ZonedClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Build from an IANA name such as `Europe/Berlin`.
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse::<Tz>().ok().map(Self::new)
    }
}

impl Clock for ZonedClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

/// A clock pinned to a chosen date that can be moved by hand.
#[derive(Debug, Clone)]
pub struct FixedClock {
    today: Cell<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Cell::new(today),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        self.today.set(today);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_can_be_moved() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());

        clock.set(NaiveDate::from_ymd_opt(2026, 7, 1).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 7, 1).unwrap());
    }

    #[test]
    fn test_zoned_clock_from_name() {
        assert!(ZonedClock::from_name("Europe/Berlin").is_some());
        assert!(ZonedClock::from_name("Mars/Olympus_Mons").is_none());
    }
}
