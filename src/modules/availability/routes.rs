use axum::{routing::get, Router};

use super::handlers::get_availability;
use crate::app_state::AppState;

pub fn availability_routes() -> Router<AppState> {
    Router::new().route("/", get(get_availability))
}
