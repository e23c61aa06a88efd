use serde::{Deserialize, Serialize};
use sqlx::types::{Json, Uuid};
use time::{Time, Weekday};
use validator::ValidationError;

/// Wall-clock "HH:MM" (de)serialization for schedule ranges.
pub mod hhmm {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use time::format_description::FormatItem;
    use time::macros::format_description;
    use time::Time;

    const FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]");

    pub fn serialize<S: Serializer>(t: &Time, serializer: S) -> Result<S::Ok, S::Error> {
        let s = t.format(FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Time, D::Error> {
        let s = String::deserialize(deserializer)?;
        Time::parse(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A half-open wall-clock range within a single day: [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(with = "hhmm")]
    pub start: Time,
    #[serde(with = "hhmm")]
    pub end: Time,
}

/// One weekday of a weekly schedule. `is_open == false` implies no ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub is_open: bool,
    pub ranges: Vec<TimeRange>,
}

impl DaySchedule {
    pub fn closed() -> Self {
        Self {
            is_open: false,
            ranges: Vec::new(),
        }
    }

    /// Ranges must be well-formed, ordered, and non-overlapping; a closed day
    /// must carry no ranges.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.is_open {
            if !self.ranges.is_empty() {
                return Err(ValidationError::new("closed_day_with_ranges"));
            }
            return Ok(());
        }
        for pair in self.ranges.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(ValidationError::new("overlapping_or_unordered_ranges"));
            }
        }
        if self.ranges.iter().any(|r| r.end <= r.start) {
            return Err(ValidationError::new("empty_range"));
        }
        Ok(())
    }
}

/// Persisted schedule row. `owner_id` is a salon id for the base schedule or
/// a professional id for an override.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct WorkingHours {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub weekday: i16,
    pub is_open: bool,
    pub ranges: Json<Vec<TimeRange>>,
}

impl WorkingHours {
    pub fn day_schedule(&self) -> DaySchedule {
        DaySchedule {
            is_open: self.is_open,
            ranges: self.ranges.0.clone(),
        }
    }
}

pub fn weekday_index(weekday: Weekday) -> i16 {
    weekday.number_days_from_monday() as i16
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetDaySchedulePayload {
    pub owner_id: Uuid,
    /// 0 = Monday .. 6 = Sunday.
    pub weekday: i16,
    pub is_open: bool,
    #[serde(default)]
    pub ranges: Vec<TimeRange>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::time;

    fn range(start: Time, end: Time) -> TimeRange {
        TimeRange { start, end }
    }

    #[test]
    fn ordered_ranges_validate() {
        let day = DaySchedule {
            is_open: true,
            ranges: vec![
                range(time!(09:00), time!(12:00)),
                range(time!(13:00), time!(18:00)),
            ],
        };
        assert!(day.validate().is_ok());
    }

    #[test]
    fn overlapping_ranges_rejected() {
        let day = DaySchedule {
            is_open: true,
            ranges: vec![
                range(time!(09:00), time!(13:00)),
                range(time!(12:00), time!(18:00)),
            ],
        };
        assert!(day.validate().is_err());
    }

    #[test]
    fn closed_day_must_be_empty() {
        let day = DaySchedule {
            is_open: false,
            ranges: vec![range(time!(09:00), time!(12:00))],
        };
        assert!(day.validate().is_err());
        assert!(DaySchedule::closed().validate().is_ok());
    }

    #[test]
    fn ranges_round_trip_as_hhmm() {
        let day = DaySchedule {
            is_open: true,
            ranges: vec![range(time!(09:30), time!(18:00))],
        };
        let json = serde_json::to_string(&day).unwrap();
        assert!(json.contains("\"09:30\""));
        let back: DaySchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day);
    }
}
