//! Activity executor
//!
//! Performs side-effecting operations on behalf of an instance. The only
//! activity in this workflow is notification dispatch, and the executor's
//! job is to make it effectively-once: a step already recorded in the
//! instance history is never sent again, which is what makes replay after
//! a crash safe.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::instance::{ApprovalInstance, StepKind, StepOutcome};
use crate::CoreError;

/// Notification templates for the approval lifecycle
pub mod templates {
    use crate::domain::instance::StepKind;

    /// Subject for the "process started" notification
    pub const SUBJECT_STARTED: &str = "Task Approval Started";

    /// Subject for the approval confirmation
    pub const SUBJECT_APPROVED: &str = "Task Approved";

    /// Subject for the rejection confirmation
    pub const SUBJECT_REJECTED: &str = "Task Rejected";

    /// Body for the "process started" notification
    pub const BODY_STARTED: &str = "Your task approval process has started.";

    /// Body for the approval confirmation
    pub const BODY_APPROVED: &str = "Your task has been approved.";

    /// Body for the rejection confirmation
    pub const BODY_REJECTED: &str = "Your task has been rejected.";

    /// Subject and body for a notification step
    pub fn for_step(kind: StepKind) -> (&'static str, &'static str) {
        match kind {
            StepKind::NotifyStart => (SUBJECT_STARTED, BODY_STARTED),
            StepKind::NotifyApproved => (SUBJECT_APPROVED, BODY_APPROVED),
            StepKind::NotifyRejected => (SUBJECT_REJECTED, BODY_REJECTED),
        }
    }
}

/// Capability for delivering a notification.
///
/// Delivery mechanics are out of scope for the engine; implementations
/// report success or failure and must not retry internally.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt to deliver a message, reporting whether it was accepted
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<bool, CoreError>;
}

/// Executes notification steps idempotently with respect to replay
pub struct ActivityExecutor {
    notifier: Arc<dyn Notifier>,
}

impl ActivityExecutor {
    /// Create an executor over the given notification capability
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Run the notification step for an instance.
    ///
    /// If the instance history already holds a record for this step kind,
    /// the recorded outcome is returned without contacting the notifier.
    /// Delivery failure is reported as an outcome, not an error; retry
    /// policy belongs to the engine.
    pub async fn notify(
        &self,
        instance: &ApprovalInstance,
        kind: StepKind,
    ) -> Result<StepOutcome, CoreError> {
        if let Some(outcome) = instance.recorded_outcome(kind) {
            debug!(
                instance_id = %instance.id,
                step = %kind,
                "notification step already recorded, skipping send"
            );
            return Ok(outcome);
        }

        let (subject, body) = templates::for_step(kind);

        match self.notifier.send(&instance.subject_email, subject, body).await {
            Ok(true) => {
                debug!(
                    instance_id = %instance.id,
                    recipient = %instance.subject_email,
                    step = %kind,
                    "notification delivered"
                );
                Ok(StepOutcome::Delivered)
            }
            Ok(false) => {
                warn!(
                    instance_id = %instance.id,
                    recipient = %instance.subject_email,
                    step = %kind,
                    "notifier reported delivery failure"
                );
                Ok(StepOutcome::DeliveryFailed)
            }
            Err(err) => {
                warn!(
                    instance_id = %instance.id,
                    recipient = %instance.subject_email,
                    step = %kind,
                    error = %err,
                    "notification dispatch failed"
                );
                Ok(StepOutcome::DeliveryFailed)
            }
        }
    }
}
