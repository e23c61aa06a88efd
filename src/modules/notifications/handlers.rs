use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::{Notification, ScheduleNotificationPayload};
use crate::error::AppResult;
use crate::services::NotificationScheduler;

#[derive(Serialize)]
pub struct ScheduledResponse {
    pub id: Uuid,
}

/// Collaborator entry point: persist a notification intent. Delivery stays
/// with the external dispatcher.
pub async fn schedule_notification(
    State(state): State<AppState>,
    Json(payload): Json<ScheduleNotificationPayload>,
) -> AppResult<impl IntoResponse> {
    let id = state
        .notifications
        .schedule(payload.appointment_id, payload.kind, payload.scheduled_for)
        .await?;
    Ok((StatusCode::CREATED, Json(ScheduledResponse { id })))
}

#[derive(Deserialize)]
pub struct DueParams {
    pub limit: Option<i64>,
}

/// Polled by the message dispatcher: pending notifications whose fire time
/// has passed.
pub async fn due_notifications(
    State(state): State<AppState>,
    Query(params): Query<DueParams>,
) -> AppResult<Json<Vec<Notification>>> {
    let due = state
        .notifications
        .due(OffsetDateTime::now_utc(), params.limit.unwrap_or(100))
        .await?;
    Ok(Json(due))
}

pub async fn mark_delivered(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.notifications.mark_sent(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_failed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.notifications.mark_failed(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
