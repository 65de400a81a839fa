//! Instance store contract
//!
//! The store is the single source of truth for approval instances. All
//! mutation goes through the compare-and-swap and versioned-append
//! primitives defined here; no component caches instance state across
//! calls. External crates implement this trait to provide different
//! persistence mechanisms.

use async_trait::async_trait;

use super::instance::{ApprovalInstance, HistoryStep, InstanceId, InstanceStatus};
use crate::CoreError;

/// Durable store for approval instances
#[async_trait]
pub trait InstanceStore: Send + Sync {
    /// Allocate a fresh instance in `Created` status with empty history.
    ///
    /// The caller validates the email before this is reached; the store
    /// only guarantees id uniqueness and persistence.
    async fn create(&self, subject_email: &str) -> Result<ApprovalInstance, CoreError>;

    /// Find an instance by ID
    async fn get(&self, id: &InstanceId) -> Result<Option<ApprovalInstance>, CoreError>;

    /// Atomically append one history step and optionally update the status.
    ///
    /// Fails with `ConcurrentModification` if the instance's version no
    /// longer matches `expected_version`, letting the caller re-read and
    /// retry. Returns the updated instance.
    async fn append_step(
        &self,
        id: &InstanceId,
        expected_version: u64,
        step: HistoryStep,
        new_status: Option<InstanceStatus>,
    ) -> Result<ApprovalInstance, CoreError>;

    /// Compare-and-swap the instance status.
    ///
    /// Fails with `InvalidTransition` (carrying the actual current status)
    /// if the instance is not in `from`. This is the primitive that
    /// serializes racing decisions: exactly one of two concurrent callers
    /// observes `from` and wins. Stamps `completed_at` when `to` is
    /// terminal. Returns the updated instance.
    async fn transition(
        &self,
        id: &InstanceId,
        from: InstanceStatus,
        to: InstanceStatus,
    ) -> Result<ApprovalInstance, CoreError>;

    /// List instances currently in the given status.
    ///
    /// Used by crash recovery to find instances left before the suspend
    /// point; not part of the external control surface.
    async fn list_by_status(
        &self,
        status: InstanceStatus,
    ) -> Result<Vec<ApprovalInstance>, CoreError>;
}
