use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    appointment_notifications, cancel_appointment, create_appointment, delete_appointment,
    get_appointment, update_appointment,
};
use crate::app_state::AppState;

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_appointment))
        .route(
            "/{id}",
            get(get_appointment)
                .patch(update_appointment)
                .delete(delete_appointment),
        )
        .route("/{id}/cancel", post(cancel_appointment))
        .route("/{id}/notifications", get(appointment_notifications))
}
