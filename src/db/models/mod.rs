mod appointment;
mod catalog;
mod notification;
mod working_hours;

pub use appointment::*;
pub use catalog::*;
pub use notification::*;
pub use working_hours::*;
