// libs/notification-cell/src/services/whatsapp.rs
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{
    BookingConfirmation, NotificationError, WhatsAppSendResponse, WhatsAppText,
    WhatsAppTextMessage,
};
use crate::services::channel::ConfirmationChannel;

/// WhatsApp Cloud API client for plain-text confirmations
/// POST /{phone_number_id}/messages
#[derive(Debug)]
pub struct WhatsAppClient {
    client: Client,
    base_url: String,
    phone_number_id: String,
    api_token: String,
}

impl WhatsAppClient {
    pub fn new(config: &AppConfig) -> Result<Self, NotificationError> {
        if !config.is_whatsapp_configured() {
            return Err(NotificationError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            base_url: config.whatsapp_api_url.trim_end_matches('/').to_string(),
            phone_number_id: config.whatsapp_phone_number_id.clone(),
            api_token: config.whatsapp_api_token.clone(),
        })
    }

    pub async fn send_text(&self, to: &str, body: String) -> Result<String, NotificationError> {
        let url = format!("{}/{}/messages", self.base_url, self.phone_number_id);

        let request_body = WhatsAppTextMessage {
            messaging_product: "whatsapp".to_string(),
            to: to.to_string(),
            message_type: "text".to_string(),
            text: WhatsAppText { body },
        };

        debug!("Sending WhatsApp message to: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("WhatsApp send failed: {} - {}", status, response_text);
            return Err(NotificationError::ApiError {
                message: format!("HTTP {}: {}", status, response_text),
            });
        }

        let parsed: WhatsAppSendResponse = serde_json::from_str(&response_text)
            .map_err(|e| NotificationError::ApiError {
                message: format!("Failed to parse send response: {}", e),
            })?;

        let message_id = parsed
            .messages
            .into_iter()
            .next()
            .map(|m| m.id)
            .ok_or_else(|| NotificationError::ApiError {
                message: "Send response carried no message id".to_string(),
            })?;

        Ok(message_id)
    }
}

#[async_trait]
impl ConfirmationChannel for WhatsAppClient {
    async fn send_confirmation(
        &self,
        confirmation: &BookingConfirmation,
    ) -> Result<(), NotificationError> {
        let to = confirmation
            .recipient_phone
            .as_deref()
            .ok_or(NotificationError::MissingRecipient(confirmation.appointment_id))?;

        let message_id = self.send_text(to, confirmation.message_body()).await?;
        info!(
            "Confirmation for appointment {} sent as WhatsApp message {}",
            confirmation.appointment_id, message_id
        );

        Ok(())
    }
}
