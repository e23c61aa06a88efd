use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::{AppError, AppResult};
use crate::services::{AvailabilityQuery, ProfessionalSlots};

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Deserialize)]
pub struct AvailabilityParams {
    pub salon_id: Uuid,
    /// ISO calendar date, e.g. "2024-01-01".
    pub date: String,
    pub professional_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct SlotTime(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);

#[derive(Serialize)]
pub struct ProfessionalSlotsResponse {
    pub professional_id: Uuid,
    pub professional_name: String,
    pub slots: Vec<SlotTime>,
}

impl From<ProfessionalSlots> for ProfessionalSlotsResponse {
    fn from(slots: ProfessionalSlots) -> Self {
        Self {
            professional_id: slots.professional_id,
            professional_name: slots.professional_name,
            slots: slots.slots.into_iter().map(SlotTime).collect(),
        }
    }
}

pub async fn get_availability(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityParams>,
) -> AppResult<Json<Vec<ProfessionalSlotsResponse>>> {
    let date = Date::parse(&params.date, DATE_FORMAT)
        .map_err(|_| AppError::Validation(format!("Invalid date: {}", params.date)))?;

    let results = state
        .availability
        .get_availability(
            AvailabilityQuery {
                salon_id: params.salon_id,
                date,
                professional_id: params.professional_id,
                service_id: params.service_id,
            },
            &state.env.schedule,
        )
        .await?;

    Ok(Json(results.into_iter().map(Into::into).collect()))
}
