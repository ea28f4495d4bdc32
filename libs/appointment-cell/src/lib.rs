// libs/appointment-cell/src/lib.rs
//! # Appointment Cell
//!
//! Turns provider availability into bookable offers and finalizes bookings.
//!
//! Read path, recomputed on every query:
//!
//! ```text
//! SlotGenerator -> LeadTimeFilter -> OccupancyFilter -> Deduplicator -> [OfferGroup]
//! ```
//!
//! Write path: the chosen offer goes through [`AssignmentPolicy`] (strict or
//! pooled, per tenant) and then [`BookingWriteGuard`], which inserts through
//! an [`AppointmentStore`]. The store is the correctness boundary for strict
//! tenants: a second booking of the same provider and timestamp fails there
//! with `SlotConflict` even if both callers were shown the same open offer.
//!
//! [`AssignmentPolicy`]: services::assignment::AssignmentPolicy
//! [`BookingWriteGuard`]: services::guard::BookingWriteGuard
//! [`AppointmentStore`]: services::store::AppointmentStore

pub mod handlers;
pub mod router;
pub mod models;
pub mod services;

pub use models::*;
