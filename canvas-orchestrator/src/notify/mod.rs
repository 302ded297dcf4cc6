//! Outbound notifications
//!
//! Terminal job outcomes are published to a user-facing channel. Delivery
//! failures are the caller's to log; they never affect job state.

pub mod webhook;

use async_trait::async_trait;
use canvas_core::dto::notification::JobNotification;
use thiserror::Error;

pub use webhook::WebhookNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("notification transport failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, notification: &JobNotification) -> Result<(), NotifyError>;
}

/// Notifier that only emits a structured log event
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn publish(&self, notification: &JobNotification) -> Result<(), NotifyError> {
        tracing::info!(
            job_id = %notification.job_id,
            kind = ?notification.kind,
            outcome = %notification.outcome,
            "{}",
            notification.summary
        );
        Ok(())
    }
}
