use crate::db::AppointmentStatus;

impl AppointmentStatus {
    /// Completed, Cancelled and NoShow are terminal; nothing moves out of them.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }

    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        match (self, next) {
            (Pending, Confirmed | Cancelled | Completed | NoShow) => true,
            (Confirmed, Completed | Cancelled | NoShow) => true,
            _ => false,
        }
    }
}
