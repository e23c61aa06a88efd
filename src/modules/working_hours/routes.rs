use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{get_day_schedule, set_day_schedule};
use crate::app_state::AppState;

pub fn working_hours_routes() -> Router<AppState> {
    Router::new()
        .route("/", put(set_day_schedule))
        .route("/{owner_id}/{weekday}", get(get_day_schedule))
}
