use super::interval::{slot_starts, subtract_busy, Interval};
use crate::db::DaySchedule;
use time::{Date, Duration, OffsetDateTime};

/// Materializes a weekday schedule into concrete intervals on a calendar
/// date. All instants are salon-local; the salon runs in a single timezone
/// and stores its wall clock as UTC.
pub fn open_intervals(date: Date, schedule: &DaySchedule) -> Vec<Interval> {
    if !schedule.is_open {
        return Vec::new();
    }
    schedule
        .ranges
        .iter()
        .map(|r| {
            Interval::new(
                date.with_time(r.start).assume_utc(),
                date.with_time(r.end).assume_utc(),
            )
        })
        .collect()
}

/// Free bookable start times for one professional on one date: the open
/// working-hour intervals minus the busy appointment intervals, stepped by
/// the booking grid. Start times where `start + duration` would spill past
/// the end of a free interval are dropped.
pub fn free_slot_starts(
    date: Date,
    schedule: &DaySchedule,
    busy: &[Interval],
    duration: Duration,
    step: Duration,
) -> Vec<OffsetDateTime> {
    let mut slots = Vec::new();
    for open in open_intervals(date, schedule) {
        for free in subtract_busy(open, busy) {
            slots.extend(slot_starts(free, duration, step));
        }
    }
    slots
}
