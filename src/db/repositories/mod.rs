mod appointment_repository;
mod catalog_repository;
mod notification_repository;
mod working_hours_repository;

pub use appointment_repository::AppointmentRepository;
pub use catalog_repository::CatalogRepository;
pub use notification_repository::NotificationRepository;
pub use working_hours_repository::WorkingHoursRepository;
