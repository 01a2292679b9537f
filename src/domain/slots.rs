use chrono::{Days, NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::domain::facility::Facility;
use crate::domain::hours_of_operation::{get_hours_of_op, is_closed, minutes_since_midnight};
use crate::error::{Error, Result};

/// Target length of a slot in minutes.
pub const MIN_TIME_SLOT_SIZE: i64 = 180;

/// Extra minutes added to the divisor when deciding how many slots a day gets.
const SLOT_COUNT_BUFFER: i64 = 60;

/// Largest chunk of leftover minutes handed to a single slot per pass.
const LEFTOVER_CHUNK: i64 = 60;

/// Days shorter than this get one slot spanning the whole window.
const SINGLE_SLOT_THRESHOLD: i64 = 360;

/// Candidate slots today must start strictly later than `now` plus this many minutes.
pub const MIN_LEAD_TIME_MINUTES: i64 = 60;

/// Upper bound on days inspected when looking for the next open day.
pub const MAX_OPEN_DAY_LOOKAHEAD: u32 = 8;

/// A window of time during which a facility is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub slot_start: NaiveDateTime,
    pub slot_end: NaiveDateTime,
}

impl Slot {
    pub fn duration_minutes(&self) -> i64 {
        (self.slot_end - self.slot_start).num_minutes()
    }
}

/// Splits an open window of `num_minutes_open` minutes into slot lengths.
///
/// Windows under six hours get one slot. Longer ones get `ceil(n / 240)` slots of 180
/// minutes, capped at `floor(n / 180)` so the slots never overrun closing time, and the
/// leftover is added back to front in chunks of up to 60 minutes.
pub fn slot_lengths(num_minutes_open: i64) -> Vec<i64> {
    if num_minutes_open <= 0 {
        return Vec::new();
    }

    if num_minutes_open < SINGLE_SLOT_THRESHOLD {
        return vec![num_minutes_open];
    }

    let divisor = MIN_TIME_SLOT_SIZE + SLOT_COUNT_BUFFER;
    let num_slots = ((num_minutes_open + divisor - 1) / divisor).min(num_minutes_open / MIN_TIME_SLOT_SIZE);
    let mut lengths = vec![MIN_TIME_SLOT_SIZE; num_slots as usize];

    let mut leftover_minutes = num_minutes_open - MIN_TIME_SLOT_SIZE * num_slots;
    let mut current_index = lengths.len() - 1;
    while leftover_minutes > 0 {
        lengths[current_index] += leftover_minutes.min(LEFTOVER_CHUNK);
        leftover_minutes -= LEFTOVER_CHUNK;

        // Wrap back to the tail instead of running past the first slot.
        current_index = current_index.checked_sub(1).unwrap_or(lengths.len() - 1);
    }

    lengths
}

/// Partitions the facility's open hours on `day` into contiguous slots.
pub fn calculate_slots(facility: &Facility, day: NaiveDate) -> Vec<Slot> {
    if is_closed(facility, day) {
        return Vec::new();
    }

    let hours = get_hours_of_op(facility, day);
    let lengths = slot_lengths(hours.minutes_open());
    if lengths.is_empty() {
        log::debug!("Facility {} has a degenerate window on {}: {:?}", facility.facility_id, day, hours);
        return Vec::new();
    }

    let midnight = day.and_time(chrono::NaiveTime::MIN);
    let mut start_of_slot = minutes_since_midnight(hours.start);

    lengths
        .into_iter()
        .map(|length| {
            let slot = Slot {
                slot_start: midnight + TimeDelta::minutes(start_of_slot),
                slot_end: midnight + TimeDelta::minutes(start_of_slot + length),
            };
            start_of_slot += length;
            slot
        })
        .collect()
}

/// Finds the first day on or after `first_candidate` on which the facility is open.
pub fn next_open_day(facility: &Facility, first_candidate: NaiveDate) -> Result<NaiveDate> {
    let mut candidate = first_candidate;
    for _ in 0..MAX_OPEN_DAY_LOOKAHEAD {
        if !is_closed(facility, candidate) {
            return Ok(candidate);
        }

        candidate = match candidate.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    Err(Error::NoOpenDayFound {
        facility_id: facility.facility_id.to_string(),
        start: first_candidate,
        days_scanned: MAX_OPEN_DAY_LOOKAHEAD,
    })
}

/// Slots still bookable today (starting more than an hour after `now`) followed by
/// every slot of the next open day after today.
pub fn all_slot_options(facility: &Facility, now: NaiveDateTime) -> Result<Vec<Slot>> {
    let today = now.date();
    let tomorrow = today.checked_add_days(Days::new(1)).ok_or_else(|| Error::NoOpenDayFound {
        facility_id: facility.facility_id.to_string(),
        start: today,
        days_scanned: 0,
    })?;
    let next_open = next_open_day(facility, tomorrow)?;
    let cutoff = now + TimeDelta::minutes(MIN_LEAD_TIME_MINUTES);

    let mut options: Vec<Slot> = calculate_slots(facility, today).into_iter().filter(|slot| slot.slot_start > cutoff).collect();
    options.extend(calculate_slots(facility, next_open));

    log::debug!("Facility {} has {} slot options after {} (next open day {})", facility.facility_id, options.len(), now, next_open);

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hours_of_operation::OpeningHours;
    use chrono::{Datelike, NaiveTime, Weekday};

    fn t(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    // 2020-04-06 was a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 4, 6).unwrap()
    }

    fn at(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        day.and_hms_opt(h, m, 0).unwrap()
    }

    fn open_monday(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Facility {
        Facility::new("mon", 0.0, 0.0, Some(OpeningHours::new().with_day(Weekday::Mon, start, end)))
    }

    #[test]
    fn twelve_hour_day_is_three_four_hour_slots() {
        let slots = calculate_slots(&open_monday(t(8, 0), t(20, 0)), monday());
        let bounds: Vec<_> = slots.iter().map(|s| (s.slot_start.time(), s.slot_end.time())).collect();
        assert_eq!(
            bounds,
            vec![
                (t(8, 0).unwrap(), t(12, 0).unwrap()),
                (t(12, 0).unwrap(), t(16, 0).unwrap()),
                (t(16, 0).unwrap(), t(20, 0).unwrap()),
            ]
        );
        assert!(slots.iter().all(|s| s.slot_start.date() == monday()));
    }

    #[test]
    fn leftover_is_packed_onto_tail_slots() {
        assert_eq!(slot_lengths(540), vec![180, 180, 180]);
        assert_eq!(slot_lengths(600), vec![180, 180, 240]);
        assert_eq!(slot_lengths(660), vec![180, 240, 240]);
        assert_eq!(slot_lengths(480), vec![240, 240]);
        assert_eq!(slot_lengths(390), vec![180, 210]);
    }

    #[test]
    fn windows_between_eight_and_nine_hours_fit_two_slots() {
        // 481..=539 minutes: three 180-minute slots would overrun closing time.
        assert_eq!(slot_lengths(481), vec![240, 241]);
        assert_eq!(slot_lengths(510), vec![240, 270]);
        assert_eq!(slot_lengths(539), vec![240, 299]);
        assert_eq!(slot_lengths(540), vec![180, 180, 180]);

        let slots = calculate_slots(&open_monday(t(8, 0), t(16, 30)), monday());
        assert_eq!(
            slots,
            vec![
                Slot { slot_start: at(monday(), 8, 0), slot_end: at(monday(), 12, 0) },
                Slot { slot_start: at(monday(), 12, 0), slot_end: at(monday(), 16, 30) },
            ]
        );
    }

    #[test]
    fn short_and_degenerate_windows() {
        assert_eq!(slot_lengths(359), vec![359]);
        assert_eq!(slot_lengths(360), vec![180, 180]);
        assert!(slot_lengths(0).is_empty());
        assert!(slot_lengths(-60).is_empty());

        assert!(calculate_slots(&open_monday(t(10, 0), t(10, 0)), monday()).is_empty());
        // Opens at 21:00 and the missing end defaults to 20:00.
        assert!(calculate_slots(&open_monday(t(21, 0), None), monday()).is_empty());
    }

    #[test]
    fn partition_covers_window_for_all_lengths() {
        for minutes in 1..=(24 * 60 - 1) {
            let lengths = slot_lengths(minutes);
            assert_eq!(lengths.iter().sum::<i64>(), minutes, "coverage for {}", minutes);
            if minutes >= SINGLE_SLOT_THRESHOLD {
                assert!(lengths.iter().all(|&l| l >= MIN_TIME_SLOT_SIZE), "min size for {}", minutes);
            }
        }
    }

    #[test]
    fn slots_are_contiguous_and_anchored_at_open() {
        let slots = calculate_slots(&open_monday(t(7, 30), t(19, 15)), monday());
        assert_eq!(slots.first().unwrap().slot_start, at(monday(), 7, 30));
        assert_eq!(slots.last().unwrap().slot_end, at(monday(), 19, 15));
        for pair in slots.windows(2) {
            assert_eq!(pair[0].slot_end, pair[1].slot_start);
        }
        assert_eq!(slots.iter().map(Slot::duration_minutes).sum::<i64>(), 11 * 60 + 45);
    }

    #[test]
    fn closed_day_has_no_slots() {
        let tuesday = monday() + Days::new(1);
        assert!(calculate_slots(&open_monday(t(9, 0), t(17, 0)), tuesday).is_empty());
    }

    #[test]
    fn next_open_day_skips_closed_days() {
        let facility = open_monday(t(9, 0), t(17, 0));
        let tuesday = monday() + Days::new(1);
        assert_eq!(next_open_day(&facility, tuesday).unwrap(), monday() + Days::new(7));
        assert_eq!(next_open_day(&facility, monday()).unwrap(), monday());
    }

    #[test]
    fn aggregator_applies_one_hour_buffer() {
        let facility = Facility::new("default", 0.0, 0.0, None);
        // 11:30 + 1h = 12:30, so the 12:00 slot is excluded and only 16:00 remains today.
        let options = all_slot_options(&facility, at(monday(), 11, 30)).unwrap();
        let tuesday = monday() + Days::new(1);
        assert_eq!(
            options.iter().map(|s| s.slot_start).collect::<Vec<_>>(),
            vec![at(monday(), 16, 0), at(tuesday, 8, 0), at(tuesday, 12, 0), at(tuesday, 16, 0)]
        );
    }

    #[test]
    fn aggregator_excludes_slot_starting_exactly_at_cutoff() {
        let facility = Facility::new("default", 0.0, 0.0, None);
        let options = all_slot_options(&facility, at(monday(), 11, 0)).unwrap();
        assert!(options.iter().all(|s| s.slot_start > at(monday(), 12, 0) || s.slot_start.date() != monday()));
        assert_eq!(options[0].slot_start, at(monday(), 16, 0));
    }

    #[test]
    fn scan_past_last_date_is_no_open_day() {
        let last = NaiveDate::MAX;
        let open_day = last.weekday().succ();
        let facility = Facility::new("end-of-time", 0.0, 0.0, Some(OpeningHours::new().with_day(open_day, t(9, 0), t(17, 0))));

        match next_open_day(&facility, last) {
            Err(Error::NoOpenDayFound { facility_id, start, .. }) => {
                assert_eq!(facility_id, "end-of-time");
                assert_eq!(start, last);
            }
            other => panic!("expected NoOpenDayFound, got {:?}", other),
        }

        let now = last.and_hms_opt(12, 0, 0).unwrap();
        assert!(matches!(all_slot_options(&facility, now), Err(Error::NoOpenDayFound { .. })));
    }

    #[test]
    fn scan_finds_open_day_within_a_week() {
        let facility = open_monday(t(9, 0), t(17, 0));
        for offset in 0..7 {
            let start = monday() + Days::new(offset);
            let found = next_open_day(&facility, start).unwrap();
            assert_eq!(found.weekday(), Weekday::Mon);
            assert!(found >= start && found - start < chrono::TimeDelta::days(7));
        }
    }
}
