use std::sync::Arc;
use time::{Date, Duration, OffsetDateTime};
use uuid::Uuid;

use crate::config::ScheduleConfig;
use crate::db::{weekday_index, DaySchedule, Professional};
use crate::error::{AppError, AppResult};
use crate::scheduling::availability::free_slot_starts;
use crate::scheduling::Interval;
use crate::services::stores::{AppointmentStore, CatalogStore, WorkingHoursStore};

#[derive(Debug, Clone)]
pub struct AvailabilityQuery {
    pub salon_id: Uuid,
    pub date: Date,
    pub professional_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
}

/// Free bookable start times for one professional on the queried date.
/// Grouping per professional is deliberate; flattening is the caller's call.
#[derive(Debug, Clone)]
pub struct ProfessionalSlots {
    pub professional_id: Uuid,
    pub professional_name: String,
    pub slots: Vec<OffsetDateTime>,
}

pub struct AvailabilityService {
    appointments: Arc<dyn AppointmentStore>,
    hours: Arc<dyn WorkingHoursStore>,
    catalog: Arc<dyn CatalogStore>,
}

impl AvailabilityService {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        hours: Arc<dyn WorkingHoursStore>,
        catalog: Arc<dyn CatalogStore>,
    ) -> Self {
        Self {
            appointments,
            hours,
            catalog,
        }
    }

    pub async fn get_availability(
        &self,
        query: AvailabilityQuery,
        config: &ScheduleConfig,
    ) -> AppResult<Vec<ProfessionalSlots>> {
        self.catalog
            .salon(query.salon_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Salon not found".to_string()))?;

        let candidates: Vec<Professional> = match query.professional_id {
            Some(id) => {
                let professional = self
                    .catalog
                    .professional(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Professional not found".to_string()))?;
                vec![professional]
            }
            None => {
                self.catalog
                    .active_professionals(query.salon_id, query.service_id)
                    .await?
            }
        };

        let duration = match query.service_id {
            Some(service_id) => {
                let service = self
                    .catalog
                    .service(service_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;
                Duration::minutes(service.duration_minutes as i64)
            }
            None => config.interval(),
        };

        let weekday = weekday_index(query.date.weekday());
        let day_start = query.date.midnight().assume_utc();
        let day_end = day_start + Duration::days(1);

        let mut results = Vec::with_capacity(candidates.len());
        for professional in candidates {
            let schedule = self
                .day_schedule_for(professional.id, query.salon_id, weekday)
                .await?;

            let busy: Vec<Interval> = self
                .appointments
                .busy_between(professional.id, day_start, day_end)
                .await?
                .iter()
                .map(|a| Interval::new(a.start_time, a.end_time))
                .collect();

            let slots =
                free_slot_starts(query.date, &schedule, &busy, duration, config.interval());
            results.push(ProfessionalSlots {
                professional_id: professional.id,
                professional_name: professional.name,
                slots,
            });
        }
        Ok(results)
    }

    /// A professional's own schedule wins over the salon's; no record at all
    /// means the day is closed, never open.
    async fn day_schedule_for(
        &self,
        professional_id: Uuid,
        salon_id: Uuid,
        weekday: i16,
    ) -> AppResult<DaySchedule> {
        if let Some(schedule) = self.hours.day_schedule(professional_id, weekday).await? {
            return Ok(schedule);
        }
        if let Some(schedule) = self.hours.day_schedule(salon_id, weekday).await? {
            return Ok(schedule);
        }
        Ok(DaySchedule::closed())
    }
}
