//! The Greenlight control-plane server
//!
//! Holds the wired-up engine and delegates the three control operations to
//! it. This layer carries no workflow logic: validation, idempotence, and
//! lifecycle rules all live in greenlight-core.

use std::sync::Arc;

use greenlight_core::{ApprovalEngine, ApprovalInstance, CoreError, SignalOutcome};

/// Decision token raised by the approve endpoint
const APPROVE_TOKEN: &str = "Approve";

/// Decision token raised by the reject endpoint
const REJECT_TOKEN: &str = "Reject";

/// Control-plane server over the approval engine
pub struct ApprovalServer {
    engine: Arc<ApprovalEngine>,
}

impl ApprovalServer {
    /// Create a server over an engine
    pub fn new(engine: Arc<ApprovalEngine>) -> Self {
        Self { engine }
    }

    /// Start a new approval instance for the given email
    pub async fn start_approval(&self, subject_email: &str) -> Result<ApprovalInstance, CoreError> {
        self.engine.start(subject_email).await
    }

    /// Deliver an approval decision to the given instance
    pub async fn approve(&self, instance_id: &str) -> Result<SignalOutcome, CoreError> {
        self.engine.signal(instance_id, APPROVE_TOKEN).await
    }

    /// Deliver a rejection decision to the given instance
    pub async fn reject(&self, instance_id: &str) -> Result<SignalOutcome, CoreError> {
        self.engine.signal(instance_id, REJECT_TOKEN).await
    }
}
