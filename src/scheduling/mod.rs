//! Pure scheduling core: interval math, the conflict predicate, availability
//! slot computation and the appointment status state machine. No I/O here;
//! the services layer wires these into storage.

pub mod availability;
pub mod conflict;
pub mod interval;
mod status;

pub use interval::Interval;
