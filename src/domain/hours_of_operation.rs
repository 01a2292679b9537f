use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::Serialize;

use crate::domain::facility::Facility;

pub const DEFAULT_OPEN: NaiveTime = match NaiveTime::from_hms_opt(8, 0, 0) {
    Some(time) => time,
    None => panic!("invalid default opening time"),
};

pub const DEFAULT_CLOSE: NaiveTime = match NaiveTime::from_hms_opt(20, 0, 0) {
    Some(time) => time,
    None => panic!("invalid default closing time"),
};

/// Order in which a week's hours are listed to users.
pub const ORDERED_DAYS: [Weekday; 7] =
    [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri, Weekday::Sat, Weekday::Sun];

/// Raw hours for one weekday. Either bound may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayHours {
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

impl DayHours {
    pub fn new(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Self {
        DayHours { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Opening and closing time after defaults have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ResolvedHours {
    /// Length of the open window in whole minutes. Seconds are ignored; negative when
    /// the facility closes before it opens.
    pub fn minutes_open(&self) -> i64 {
        minutes_since_midnight(self.end) - minutes_since_midnight(self.start)
    }
}

pub fn minutes_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

/// Per-weekday hours of a facility. A weekday missing from the map behaves like an empty entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpeningHours {
    days: HashMap<Weekday, DayHours>,
}

impl OpeningHours {
    pub fn new() -> Self {
        OpeningHours { days: HashMap::new() }
    }

    pub fn insert(&mut self, day: Weekday, hours: DayHours) {
        self.days.insert(day, hours);
    }

    pub fn with_day(mut self, day: Weekday, start: Option<NaiveTime>, end: Option<NaiveTime>) -> Self {
        self.insert(day, DayHours::new(start, end));
        self
    }

    pub fn day(&self, day: Weekday) -> Option<&DayHours> {
        self.days.get(&day)
    }

    /// True if at least one weekday carries a start or an end time.
    pub fn has_hours_data(&self) -> bool {
        self.days.values().any(|hours| !hours.is_empty())
    }
}

/// One row of a facility's weekly hours listing; `hours` is `None` on closed days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub day: Weekday,
    pub hours: Option<ResolvedHours>,
}

/// A facility is closed on `day` only when it publishes hours for some weekday
/// but none for this one. Facilities without hours are never closed.
pub fn is_closed(facility: &Facility, day: NaiveDate) -> bool {
    is_closed_on(facility, day.weekday())
}

fn is_closed_on(facility: &Facility, weekday: Weekday) -> bool {
    let Some(hours_of_op) = &facility.hours_of_operation else {
        return false;
    };

    if !hours_of_op.has_hours_data() {
        return false;
    }

    hours_of_op.day(weekday).is_none_or(DayHours::is_empty)
}

/// Returns the hours for `day`, filling a missing start with 08:00 and a missing end with 20:00.
pub fn get_hours_of_op(facility: &Facility, day: NaiveDate) -> ResolvedHours {
    hours_of_op_on(facility, day.weekday())
}

fn hours_of_op_on(facility: &Facility, weekday: Weekday) -> ResolvedHours {
    let hours = facility
        .hours_of_operation
        .as_ref()
        .and_then(|hours_of_op| hours_of_op.day(weekday).copied())
        .unwrap_or_default();

    ResolvedHours { start: hours.start.unwrap_or(DEFAULT_OPEN), end: hours.end.unwrap_or(DEFAULT_CLOSE) }
}

/// Hours for each weekday from Monday to Sunday.
pub fn weekly_schedule(facility: &Facility) -> Vec<DaySchedule> {
    ORDERED_DAYS
        .iter()
        .map(|&day| DaySchedule {
            day,
            hours: (!is_closed_on(facility, day)).then(|| hours_of_op_on(facility, day)),
        })
        .collect()
}
