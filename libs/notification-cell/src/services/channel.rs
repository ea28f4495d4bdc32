// libs/notification-cell/src/services/channel.rs
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use shared_config::AppConfig;

use crate::models::{BookingConfirmation, NotificationError};
use crate::services::whatsapp::WhatsAppClient;

/// Outbound channel for booking confirmations.
#[async_trait]
pub trait ConfirmationChannel: Send + Sync {
    async fn send_confirmation(
        &self,
        confirmation: &BookingConfirmation,
    ) -> Result<(), NotificationError>;
}

/// Used when no messaging provider is configured.
pub struct NoopChannel;

#[async_trait]
impl ConfirmationChannel for NoopChannel {
    async fn send_confirmation(
        &self,
        confirmation: &BookingConfirmation,
    ) -> Result<(), NotificationError> {
        info!(
            "Confirmation for appointment {} not sent: no channel configured",
            confirmation.appointment_id
        );
        Ok(())
    }
}

pub fn channel_from_config(config: &AppConfig) -> Arc<dyn ConfirmationChannel> {
    match WhatsAppClient::new(config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!("Booking confirmations disabled: {}", e);
            Arc::new(NoopChannel)
        }
    }
}

/// Sends on a detached task. Failures are logged for operators and never
/// reach the caller that made the booking.
pub fn dispatch_confirmation(
    channel: Arc<dyn ConfirmationChannel>,
    confirmation: BookingConfirmation,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = channel.send_confirmation(&confirmation).await {
            error!(
                appointment_id = %confirmation.appointment_id,
                patient_id = %confirmation.patient_id,
                "Booking confirmation failed: {}",
                e
            );
        }
    })
}
