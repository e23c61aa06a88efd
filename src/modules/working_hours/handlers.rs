use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::{DaySchedule, SetDaySchedulePayload};
use crate::error::{AppError, AppResult};
use crate::services::stores::WorkingHoursStore;

fn check_weekday(weekday: i16) -> AppResult<()> {
    if !(0..=6).contains(&weekday) {
        return Err(AppError::Validation(format!(
            "Weekday must be 0 (Monday) through 6 (Sunday), got {weekday}"
        )));
    }
    Ok(())
}

pub async fn set_day_schedule(
    State(state): State<AppState>,
    Json(payload): Json<SetDaySchedulePayload>,
) -> AppResult<Json<DaySchedule>> {
    check_weekday(payload.weekday)?;
    let schedule = DaySchedule {
        is_open: payload.is_open,
        ranges: payload.ranges,
    };
    schedule
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    state
        .hours
        .set_day_schedule(payload.owner_id, payload.weekday, schedule.clone())
        .await?;
    Ok(Json(schedule))
}

pub async fn get_day_schedule(
    State(state): State<AppState>,
    Path((owner_id, weekday)): Path<(Uuid, i16)>,
) -> AppResult<Json<DaySchedule>> {
    check_weekday(weekday)?;
    let schedule = state
        .hours
        .day_schedule(owner_id, weekday)
        .await?
        .unwrap_or_else(DaySchedule::closed);
    Ok(Json(schedule))
}
