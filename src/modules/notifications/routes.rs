use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{due_notifications, mark_delivered, mark_failed, schedule_notification};
use crate::app_state::AppState;

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(schedule_notification))
        .route("/due", get(due_notifications))
        .route("/{id}/delivered", post(mark_delivered))
        .route("/{id}/failed", post(mark_failed))
}
