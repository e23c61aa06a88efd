use time::{Duration, OffsetDateTime};

/// A half-open time interval: [start, end). Instants at `end` are not part of
/// the interval, so back-to-back intervals do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl Interval {
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Removes the busy intervals from a free one, returning the remaining free
/// pieces in order. Busy intervals may arrive unsorted or overlapping each
/// other; empty intervals are ignored.
pub fn subtract_busy(free: Interval, busy: &[Interval]) -> Vec<Interval> {
    let mut busy: Vec<Interval> = busy.iter().copied().filter(|b| !b.is_empty()).collect();
    busy.sort_by_key(|b| b.start);

    let mut result = Vec::new();
    let mut cursor = free.start;
    for b in busy {
        if b.end <= cursor || b.start >= free.end {
            continue;
        }
        if b.start > cursor {
            result.push(Interval::new(cursor, b.start.min(free.end)));
        }
        cursor = cursor.max(b.end);
    }
    if cursor < free.end {
        result.push(Interval::new(cursor, free.end));
    }
    result
}

/// Discrete bookable start times within a free interval: steps of `step`
/// from the interval start, keeping starts where the whole `duration` still
/// fits before the interval ends.
pub fn slot_starts(free: Interval, duration: Duration, step: Duration) -> Vec<OffsetDateTime> {
    let mut slots = Vec::new();
    if duration <= Duration::ZERO || step <= Duration::ZERO {
        return slots;
    }
    let mut start = free.start;
    while start + duration <= free.end {
        slots.push(start);
        start += step;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn iv(start: OffsetDateTime, end: OffsetDateTime) -> Interval {
        Interval::new(start, end)
    }

    #[test]
    fn back_to_back_intervals_do_not_overlap() {
        let a = iv(datetime!(2024-01-01 09:00 UTC), datetime!(2024-01-01 10:00 UTC));
        let b = iv(datetime!(2024-01-01 10:00 UTC), datetime!(2024-01-01 11:00 UTC));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn partial_overlap_detected() {
        let a = iv(datetime!(2024-01-01 10:00 UTC), datetime!(2024-01-01 11:00 UTC));
        let b = iv(datetime!(2024-01-01 10:30 UTC), datetime!(2024-01-01 11:30 UTC));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn containment_detected() {
        let outer = iv(datetime!(2024-01-01 09:00 UTC), datetime!(2024-01-01 12:00 UTC));
        let inner = iv(datetime!(2024-01-01 10:00 UTC), datetime!(2024-01-01 11:00 UTC));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn subtract_splits_around_busy_middle() {
        let free = iv(datetime!(2024-01-01 09:00 UTC), datetime!(2024-01-01 18:00 UTC));
        let busy = [iv(datetime!(2024-01-01 10:00 UTC), datetime!(2024-01-01 11:00 UTC))];
        let remaining = subtract_busy(free, &busy);
        assert_eq!(
            remaining,
            vec![
                iv(datetime!(2024-01-01 09:00 UTC), datetime!(2024-01-01 10:00 UTC)),
                iv(datetime!(2024-01-01 11:00 UTC), datetime!(2024-01-01 18:00 UTC)),
            ]
        );
    }

    #[test]
    fn subtract_handles_unsorted_and_overlapping_busy() {
        let free = iv(datetime!(2024-01-01 09:00 UTC), datetime!(2024-01-01 18:00 UTC));
        let busy = [
            iv(datetime!(2024-01-01 14:00 UTC), datetime!(2024-01-01 15:00 UTC)),
            iv(datetime!(2024-01-01 10:00 UTC), datetime!(2024-01-01 12:00 UTC)),
            iv(datetime!(2024-01-01 11:00 UTC), datetime!(2024-01-01 13:00 UTC)),
        ];
        let remaining = subtract_busy(free, &busy);
        assert_eq!(
            remaining,
            vec![
                iv(datetime!(2024-01-01 09:00 UTC), datetime!(2024-01-01 10:00 UTC)),
                iv(datetime!(2024-01-01 13:00 UTC), datetime!(2024-01-01 14:00 UTC)),
                iv(datetime!(2024-01-01 15:00 UTC), datetime!(2024-01-01 18:00 UTC)),
            ]
        );
    }

    #[test]
    fn subtract_with_busy_covering_everything() {
        let free = iv(datetime!(2024-01-01 09:00 UTC), datetime!(2024-01-01 12:00 UTC));
        let busy = [iv(datetime!(2024-01-01 08:00 UTC), datetime!(2024-01-01 13:00 UTC))];
        assert!(subtract_busy(free, &busy).is_empty());
    }

    #[test]
    fn slot_grid_steps_until_duration_no_longer_fits() {
        let free = iv(datetime!(2024-01-01 09:00 UTC), datetime!(2024-01-01 11:00 UTC));
        let slots = slot_starts(free, Duration::minutes(60), Duration::minutes(30));
        assert_eq!(
            slots,
            vec![
                datetime!(2024-01-01 09:00 UTC),
                datetime!(2024-01-01 09:30 UTC),
                datetime!(2024-01-01 10:00 UTC),
            ]
        );
    }

    #[test]
    fn interval_shorter_than_duration_yields_nothing() {
        let free = iv(datetime!(2024-01-01 09:00 UTC), datetime!(2024-01-01 09:45 UTC));
        assert!(slot_starts(free, Duration::minutes(60), Duration::minutes(30)).is_empty());
    }
}
