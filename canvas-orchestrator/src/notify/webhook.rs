//! Webhook notifier
//!
//! POSTs each notification as JSON to a subscriber URL.

use async_trait::async_trait;
use canvas_core::dto::notification::JobNotification;
use reqwest::Client;

use super::{Notifier, NotifyError};

pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn publish(&self, notification: &JobNotification) -> Result<(), NotifyError> {
        let response = self.client.post(&self.url).json(notification).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!("Notification for job {} delivered", notification.job_id);
        Ok(())
    }
}
