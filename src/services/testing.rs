//! In-memory implementations of the store seams plus a pre-wired fixture,
//! shared by the service test modules.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::ScheduleConfig;
use crate::db::{
    Appointment, Client, DatabaseError, DaySchedule, Notification, NotificationKind,
    NotificationStatus, Professional, Salon, Service,
};
use crate::scheduling::{conflict, Interval};
use crate::services::stores::{
    AppointmentStore, CatalogStore, NotificationStore, WorkingHoursStore,
};
use crate::services::{AvailabilityService, BookingService, NotificationService};

#[derive(Default)]
struct Inner {
    appointments: Vec<Appointment>,
    notifications: Vec<Notification>,
    hours: HashMap<(Uuid, i16), DaySchedule>,
    salons: HashMap<Uuid, Salon>,
    clients: HashMap<Uuid, Client>,
    professionals: HashMap<Uuid, Professional>,
    services: HashMap<Uuid, Service>,
    qualifications: HashSet<(Uuid, Uuid)>,
}

/// All four store seams over one mutex, which is exactly the atomicity the
/// conflict-check-plus-insert contract asks for.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn add_salon(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.lock().unwrap().salons.insert(
            id,
            Salon {
                id,
                name: name.to_string(),
                created_at: OffsetDateTime::now_utc(),
            },
        );
        id
    }

    pub fn add_client(&self, salon_id: Uuid, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.lock().unwrap().clients.insert(
            id,
            Client {
                id,
                salon_id,
                name: name.to_string(),
                phone: None,
                created_at: OffsetDateTime::now_utc(),
            },
        );
        id
    }

    pub fn add_professional(&self, salon_id: Uuid, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.lock().unwrap().professionals.insert(
            id,
            Professional {
                id,
                salon_id,
                name: name.to_string(),
                active: true,
                created_at: OffsetDateTime::now_utc(),
            },
        );
        id
    }

    pub fn add_service(
        &self,
        salon_id: Uuid,
        name: &str,
        duration_minutes: i32,
        price_cents: i64,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.lock().unwrap().services.insert(
            id,
            Service {
                id,
                salon_id,
                name: name.to_string(),
                duration_minutes,
                price_cents,
                active: true,
                created_at: OffsetDateTime::now_utc(),
            },
        );
        id
    }

    pub fn qualify(&self, professional_id: Uuid, service_id: Uuid) {
        self.inner
            .lock()
            .unwrap()
            .qualifications
            .insert((professional_id, service_id));
    }

    pub fn rename_client(&self, id: Uuid, name: &str) {
        if let Some(client) = self.inner.lock().unwrap().clients.get_mut(&id) {
            client.name = name.to_string();
        }
    }

    pub fn set_service_price(&self, id: Uuid, price_cents: i64) {
        if let Some(service) = self.inner.lock().unwrap().services.get_mut(&id) {
            service.price_cents = price_cents;
        }
    }
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn create_checked(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, DatabaseError> {
        let mut inner = self.inner.lock().unwrap();
        let candidate = Interval::new(appointment.start_time, appointment.end_time);
        if conflict::has_conflict(
            &inner.appointments,
            appointment.professional_id,
            candidate,
            None,
        ) {
            return Err(DatabaseError::Conflict);
        }
        inner.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn update_checked(
        &self,
        appointment: Appointment,
        recheck_conflict: bool,
    ) -> Result<Appointment, DatabaseError> {
        let mut inner = self.inner.lock().unwrap();
        if recheck_conflict {
            let candidate = Interval::new(appointment.start_time, appointment.end_time);
            if conflict::has_conflict(
                &inner.appointments,
                appointment.professional_id,
                candidate,
                Some(appointment.id),
            ) {
                return Err(DatabaseError::Conflict);
            }
        }
        let slot = inner
            .appointments
            .iter_mut()
            .find(|a| a.id == appointment.id)
            .ok_or(DatabaseError::NotFound)?;
        *slot = appointment.clone();
        Ok(appointment)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, DatabaseError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .appointments
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn busy_between(
        &self,
        professional_id: Uuid,
        window_start: OffsetDateTime,
        window_end: OffsetDateTime,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        let window = Interval::new(window_start, window_end);
        let mut rows: Vec<Appointment> = self
            .inner
            .lock()
            .unwrap()
            .appointments
            .iter()
            .filter(|a| {
                a.professional_id == professional_id
                    && a.status != crate::db::AppointmentStatus::Cancelled
                    && Interval::new(a.start_time, a.end_time).overlaps(&window)
            })
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.start_time);
        Ok(rows)
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.appointments.len();
        inner.appointments.retain(|a| a.id != id);
        if inner.appointments.len() == before {
            return Err(DatabaseError::NotFound);
        }
        inner.notifications.retain(|n| n.appointment_id != id);
        Ok(())
    }
}

#[async_trait]
impl WorkingHoursStore for InMemoryStore {
    async fn day_schedule(
        &self,
        owner_id: Uuid,
        weekday: i16,
    ) -> Result<Option<DaySchedule>, DatabaseError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .hours
            .get(&(owner_id, weekday))
            .cloned())
    }

    async fn set_day_schedule(
        &self,
        owner_id: Uuid,
        weekday: i16,
        schedule: DaySchedule,
    ) -> Result<(), DatabaseError> {
        self.inner
            .lock()
            .unwrap()
            .hours
            .insert((owner_id, weekday), schedule);
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn salon(&self, id: Uuid) -> Result<Option<Salon>, DatabaseError> {
        Ok(self.inner.lock().unwrap().salons.get(&id).cloned())
    }

    async fn client(&self, id: Uuid) -> Result<Option<Client>, DatabaseError> {
        Ok(self.inner.lock().unwrap().clients.get(&id).cloned())
    }

    async fn professional(&self, id: Uuid) -> Result<Option<Professional>, DatabaseError> {
        Ok(self.inner.lock().unwrap().professionals.get(&id).cloned())
    }

    async fn service(&self, id: Uuid) -> Result<Option<Service>, DatabaseError> {
        Ok(self.inner.lock().unwrap().services.get(&id).cloned())
    }

    async fn active_professionals(
        &self,
        salon_id: Uuid,
        service_id: Option<Uuid>,
    ) -> Result<Vec<Professional>, DatabaseError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<Professional> = inner
            .professionals
            .values()
            .filter(|p| p.salon_id == salon_id && p.active)
            .filter(|p| match service_id {
                Some(service_id) => inner.qualifications.contains(&(p.id, service_id)),
                None => true,
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }
}

#[async_trait]
impl NotificationStore for InMemoryStore {
    async fn insert(&self, notification: Notification) -> Result<Notification, DatabaseError> {
        self.inner
            .lock()
            .unwrap()
            .notifications
            .push(notification.clone());
        Ok(notification)
    }

    async fn due(
        &self,
        now: OffsetDateTime,
        limit: i64,
    ) -> Result<Vec<Notification>, DatabaseError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .notifications
            .iter()
            .filter(|n| {
                n.status == NotificationStatus::Pending
                    && n.scheduled_for.map_or(true, |at| at <= now)
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: NotificationStatus,
    ) -> Result<(), DatabaseError> {
        let mut inner = self.inner.lock().unwrap();
        let notification = inner
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(DatabaseError::NotFound)?;
        notification.status = status;
        Ok(())
    }

    async fn delete_pending_reminders(
        &self,
        appointment_id: Uuid,
    ) -> Result<u64, DatabaseError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.notifications.len();
        inner.notifications.retain(|n| {
            !(n.appointment_id == appointment_id
                && n.kind == NotificationKind::Reminder
                && n.status == NotificationStatus::Pending)
        });
        Ok((before - inner.notifications.len()) as u64)
    }

    async fn for_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Vec<Notification>, DatabaseError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .notifications
            .iter()
            .filter(|n| n.appointment_id == appointment_id)
            .cloned()
            .collect())
    }
}

/// One salon with a client, a qualified professional and a 60-minute service,
/// wired to fully in-memory services.
pub struct TestWorld {
    pub store: Arc<InMemoryStore>,
    pub booking: BookingService,
    pub availability: AvailabilityService,
    pub notifications: Arc<NotificationService>,
    pub config: ScheduleConfig,
    pub salon_id: Uuid,
    pub client_id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
}

impl TestWorld {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let salon_id = store.add_salon("Studio Luma");
        let client_id = store.add_client(salon_id, "Ana Souza");
        let professional_id = store.add_professional(salon_id, "Bruna Lima");
        let service_id = store.add_service(salon_id, "Haircut", 60, 8_000);
        store.qualify(professional_id, service_id);

        let config = ScheduleConfig::default();
        let notifications = Arc::new(NotificationService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            config.clone(),
        ));
        let booking = BookingService::new(store.clone(), store.clone(), notifications.clone());
        let availability = AvailabilityService::new(store.clone(), store.clone(), store.clone());

        Self {
            store,
            booking,
            availability,
            notifications,
            config,
            salon_id,
            client_id,
            professional_id,
            service_id,
        }
    }
}
