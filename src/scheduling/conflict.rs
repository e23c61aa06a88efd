use super::interval::Interval;
use crate::db::{Appointment, AppointmentStatus};
use uuid::Uuid;

/// The overlap test the booking path runs before every insert or time change:
/// a candidate interval conflicts when any non-cancelled appointment for the
/// same professional overlaps it on half-open intervals. `exclude` lets an
/// update skip comparing an appointment against itself.
///
/// The Postgres repository expresses this same predicate in SQL; this form
/// backs the in-memory store and the unit tests.
pub fn has_conflict(
    existing: &[Appointment],
    professional_id: Uuid,
    candidate: Interval,
    exclude: Option<Uuid>,
) -> bool {
    if candidate.is_empty() {
        return false;
    }
    existing.iter().any(|a| {
        a.professional_id == professional_id
            && a.status != AppointmentStatus::Cancelled
            && Some(a.id) != exclude
            && Interval::new(a.start_time, a.end_time).overlaps(&candidate)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::OffsetDateTime;

    fn appointment(
        professional_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
        status: AppointmentStatus,
    ) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            salon_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            professional_id,
            service_id: Uuid::new_v4(),
            status,
            start_time: start,
            end_time: end,
            price_cents: 5000,
            notes: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn overlapping_confirmed_booking_conflicts() {
        let pro = Uuid::new_v4();
        let existing = vec![appointment(
            pro,
            datetime!(2024-01-01 10:00 UTC),
            datetime!(2024-01-01 11:00 UTC),
            AppointmentStatus::Confirmed,
        )];
        let candidate = Interval::new(
            datetime!(2024-01-01 10:30 UTC),
            datetime!(2024-01-01 11:30 UTC),
        );
        assert!(has_conflict(&existing, pro, candidate, None));
    }

    #[test]
    fn cancelled_booking_never_conflicts() {
        let pro = Uuid::new_v4();
        let existing = vec![appointment(
            pro,
            datetime!(2024-01-01 10:00 UTC),
            datetime!(2024-01-01 11:00 UTC),
            AppointmentStatus::Cancelled,
        )];
        let candidate = Interval::new(
            datetime!(2024-01-01 10:00 UTC),
            datetime!(2024-01-01 11:00 UTC),
        );
        assert!(!has_conflict(&existing, pro, candidate, None));
    }

    #[test]
    fn back_to_back_is_not_a_conflict() {
        let pro = Uuid::new_v4();
        let existing = vec![appointment(
            pro,
            datetime!(2024-01-01 10:00 UTC),
            datetime!(2024-01-01 11:00 UTC),
            AppointmentStatus::Pending,
        )];
        let candidate = Interval::new(
            datetime!(2024-01-01 11:00 UTC),
            datetime!(2024-01-01 12:00 UTC),
        );
        assert!(!has_conflict(&existing, pro, candidate, None));
    }

    #[test]
    fn other_professionals_bookings_are_ignored() {
        let pro = Uuid::new_v4();
        let existing = vec![appointment(
            Uuid::new_v4(),
            datetime!(2024-01-01 10:00 UTC),
            datetime!(2024-01-01 11:00 UTC),
            AppointmentStatus::Confirmed,
        )];
        let candidate = Interval::new(
            datetime!(2024-01-01 10:00 UTC),
            datetime!(2024-01-01 11:00 UTC),
        );
        assert!(!has_conflict(&existing, pro, candidate, None));
    }

    #[test]
    fn exclude_lets_an_update_skip_itself() {
        let pro = Uuid::new_v4();
        let existing = vec![appointment(
            pro,
            datetime!(2024-01-01 10:00 UTC),
            datetime!(2024-01-01 11:00 UTC),
            AppointmentStatus::Pending,
        )];
        let candidate = Interval::new(
            datetime!(2024-01-01 10:15 UTC),
            datetime!(2024-01-01 11:15 UTC),
        );
        assert!(has_conflict(&existing, pro, candidate, None));
        assert!(!has_conflict(&existing, pro, candidate, Some(existing[0].id)));
    }

    #[test]
    fn zero_duration_candidate_never_conflicts() {
        let pro = Uuid::new_v4();
        let existing = vec![appointment(
            pro,
            datetime!(2024-01-01 10:00 UTC),
            datetime!(2024-01-01 11:00 UTC),
            AppointmentStatus::Pending,
        )];
        let candidate = Interval::new(
            datetime!(2024-01-01 10:30 UTC),
            datetime!(2024-01-01 10:30 UTC),
        );
        assert!(!has_conflict(&existing, pro, candidate, None));
    }
}
