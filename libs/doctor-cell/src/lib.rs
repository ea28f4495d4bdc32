//! # Doctor Cell
//!
//! Provider roster and recurring weekly availability, plus the slot generator
//! that turns availability into bookable start times for a calendar date.
//!
//! ```text
//! +-----------------------------------------------------+
//! |                   Doctor Cell                       |
//! +-----------------------------------------------------+
//! |  handlers.rs    |  Provider/window admin endpoints  |
//! |  router.rs      |  Route definitions                |
//! |  models.rs      |  Providers, windows, slot offers  |
//! |  services/      |                                   |
//! |    availability.rs | AvailabilityIndex + service    |
//! |    slots.rs     |  SlotGenerator                    |
//! +-----------------------------------------------------+
//! ```

pub mod handlers;
pub mod router;
pub mod models;
pub mod services;

pub use models::*;
pub use services::*;
