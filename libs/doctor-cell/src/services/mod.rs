pub mod availability;
pub mod slots;

pub use availability::{AvailabilityIndex, AvailabilityService};
pub use slots::{day_of_week, SlotGenerator};
