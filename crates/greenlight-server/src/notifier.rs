//! Notification transport
//!
//! The engine only requires the [`Notifier`] capability; this module
//! provides the default implementation used by the server binary. It logs
//! the delivery and reports success, which is the seam where an SMTP or
//! provider-API transport plugs in.

use async_trait::async_trait;
use greenlight_core::{CoreError, Notifier};
use tracing::info;

/// Notifier that records deliveries in the log stream
pub struct LoggingNotifier;

impl LoggingNotifier {
    /// Create a logging notifier
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<bool, CoreError> {
        info!(
            recipient = %recipient,
            subject = %subject,
            body = %body,
            "sending notification"
        );
        Ok(true)
    }
}
