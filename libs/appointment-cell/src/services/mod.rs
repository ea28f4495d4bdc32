// libs/appointment-cell/src/services/mod.rs
pub mod assignment;
pub mod clock;
pub mod dedup;
pub mod filters;
pub mod guard;
pub mod offers;
pub mod scheduling;
pub mod store;
pub mod supabase_store;

pub use assignment::{AssignmentInput, AssignmentPolicy};
pub use clock::{Clock, FixedClock, SystemClock};
pub use dedup::Deduplicator;
pub use filters::{LeadTimeFilter, OccupancyFilter};
pub use guard::{classify_duplicate, BookingWriteGuard};
pub use offers::build_offers;
pub use scheduling::SchedulingService;
pub use store::{AppointmentStore, InMemoryAppointmentStore};
pub use supabase_store::SupabaseAppointmentStore;
