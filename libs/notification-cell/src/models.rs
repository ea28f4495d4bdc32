// libs/notification-cell/src/models.rs
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Emitted once per successful booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub appointment_id: Uuid,
    pub patient_id: String,
    pub provider_id: Uuid,
    pub provider_name: String,
    pub scheduled_at: DateTime<FixedOffset>,
    pub recipient_phone: Option<String>,
}

impl BookingConfirmation {
    pub fn message_body(&self) -> String {
        format!(
            "Your appointment with {} is confirmed for {} at {}. Booking reference: {}",
            self.provider_name,
            self.scheduled_at.format("%d-%m-%Y"),
            self.scheduled_at.format("%H:%M"),
            self.appointment_id,
        )
    }
}

// ==============================================================================
// WHATSAPP CLOUD API PAYLOADS
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct WhatsAppTextMessage {
    pub messaging_product: String,
    pub to: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub text: WhatsAppText,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhatsAppText {
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppSendResponse {
    #[serde(default)]
    pub messages: Vec<WhatsAppMessageId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppMessageId {
    pub id: String,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("WhatsApp integration not configured")]
    NotConfigured,

    #[error("No recipient phone for appointment {0}")]
    MissingRecipient(Uuid),

    #[error("WhatsApp API error: {message}")]
    ApiError { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}
