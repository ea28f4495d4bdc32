// libs/notification-cell/src/services/mod.rs
pub mod channel;
pub mod whatsapp;

pub use channel::{channel_from_config, dispatch_confirmation, ConfirmationChannel, NoopChannel};
pub use whatsapp::WhatsAppClient;
