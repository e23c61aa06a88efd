use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::{Appointment, NewAppointment, Notification, UpdateAppointmentPayload};
use crate::error::AppResult;
use crate::services::BookingOutcome;

#[derive(Serialize)]
pub struct BookingResponse {
    pub appointment: Appointment,
    /// Non-fatal problems, e.g. a reminder that could not be scheduled.
    pub warnings: Vec<String>,
}

impl From<BookingOutcome> for BookingResponse {
    fn from(outcome: BookingOutcome) -> Self {
        Self {
            appointment: outcome.appointment,
            warnings: outcome.warnings,
        }
    }
}

pub async fn create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<NewAppointment>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let outcome = state.booking.create(payload).await?;
    Ok((StatusCode::CREATED, Json(BookingResponse::from(outcome))))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    let appointment = state.booking.get(id).await?;
    Ok(Json(appointment))
}

pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentPayload>,
) -> AppResult<Json<BookingResponse>> {
    payload.validate()?;
    let outcome = state.booking.update(id, payload).await?;
    Ok(Json(BookingResponse::from(outcome)))
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookingResponse>> {
    let outcome = state.booking.cancel(id).await?;
    Ok(Json(BookingResponse::from(outcome)))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.booking.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn appointment_notifications(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Notification>>> {
    // 404 for an unknown appointment rather than an empty list.
    state.booking.get(id).await?;
    let notifications = state.notifications.for_appointment(id).await?;
    Ok(Json(notifications))
}
