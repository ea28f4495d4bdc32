// libs/notification-cell/src/lib.rs
//! # Notification Cell
//!
//! Delivers booking confirmations to patients. The scheduling engine hands a
//! finalized booking to a [`ConfirmationChannel`]; delivery runs on its own
//! task and a failed send is logged, never propagated back into the booking.
//!
//! ```text
//! +-----------------------------------------------------+
//! |                 Notification Cell                   |
//! +-----------------------------------------------------+
//! |  models.rs      |  Confirmation payloads & errors   |
//! |  services/      |                                   |
//! |    channel.rs   |  Channel trait, no-op, dispatch   |
//! |    whatsapp.rs  |  WhatsApp Cloud API client        |
//! +-----------------------------------------------------+
//! ```

pub mod models;
pub mod services;

pub use models::*;
pub use services::*;
