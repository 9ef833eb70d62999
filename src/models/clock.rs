use std::cell::Cell;
use std::rc::Rc;

use chrono::{Local, NaiveDateTime};

/// Source of the timestamp stamped on new movements.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    instant: Rc<Cell<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(instant: NaiveDateTime) -> Self {
        Self {
            instant: Rc::new(Cell::new(instant)),
        }
    }

    pub fn set(&self, instant: NaiveDateTime) {
        self.instant.set(instant);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.instant.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn manual_clock_clones_share_instant() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let later = start + chrono::Duration::days(40);

        let clock = ManualClock::new(start);
        let shared = clock.clone();
        clock.set(later);

        assert_eq!(shared.now(), later);
    }
}
