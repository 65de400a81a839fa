use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use greenlight_core::domain::instance::{
    ApprovalInstance, HistoryStep, InstanceId, InstanceStatus,
};
use greenlight_core::domain::store::InstanceStore;
use greenlight_core::CoreError;

/// In-memory implementation of the instance store.
///
/// Instances live in a concurrent map keyed by instance id. Mutations run
/// under the map's per-entry lock, which gives the compare-and-swap and
/// versioned-append primitives their atomicity: two racing decisions against
/// the same instance serialize on the entry, and exactly one wins.
///
/// Instances are never deleted; retention is an external concern.
pub struct InMemoryInstanceStore {
    instances: DashMap<String, ApprovalInstance>,
}

impl InMemoryInstanceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            instances: DashMap::with_capacity(64),
        }
    }

    /// Number of instances held
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the store holds no instances
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Default for InMemoryInstanceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InstanceStore for InMemoryInstanceStore {
    async fn create(&self, subject_email: &str) -> Result<ApprovalInstance, CoreError> {
        let instance = ApprovalInstance::new(subject_email);

        match self.instances.entry(instance.id.0.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(instance.clone());
                debug!(instance_id = %instance.id, "created approval instance");
                Ok(instance)
            }
            // UUIDv4 collision; never reuse an id
            Entry::Occupied(_) => Err(CoreError::StateStore(format!(
                "Instance id already exists: {}",
                instance.id
            ))),
        }
    }

    async fn get(&self, id: &InstanceId) -> Result<Option<ApprovalInstance>, CoreError> {
        Ok(self.instances.get(&id.0).map(|entry| entry.clone()))
    }

    async fn append_step(
        &self,
        id: &InstanceId,
        expected_version: u64,
        step: HistoryStep,
        new_status: Option<InstanceStatus>,
    ) -> Result<ApprovalInstance, CoreError> {
        let mut entry = self
            .instances
            .get_mut(&id.0)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        if entry.version != expected_version {
            return Err(CoreError::ConcurrentModification(id.to_string()));
        }

        if let Some(status) = new_status {
            if !entry.status.can_transition_to(status) {
                return Err(CoreError::InvalidTransition {
                    instance_id: id.to_string(),
                    from: entry.status,
                    to: status,
                });
            }
            entry.status = status;
            if status.is_terminal() {
                entry.completed_at = Some(Utc::now());
            }
        }

        entry.history.push(step);
        entry.version += 1;

        Ok(entry.clone())
    }

    async fn transition(
        &self,
        id: &InstanceId,
        from: InstanceStatus,
        to: InstanceStatus,
    ) -> Result<ApprovalInstance, CoreError> {
        let mut entry = self
            .instances
            .get_mut(&id.0)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        if entry.status != from {
            return Err(CoreError::InvalidTransition {
                instance_id: id.to_string(),
                from: entry.status,
                to,
            });
        }

        if !from.can_transition_to(to) {
            return Err(CoreError::InvalidTransition {
                instance_id: id.to_string(),
                from,
                to,
            });
        }

        entry.status = to;
        if to.is_terminal() {
            entry.completed_at = Some(Utc::now());
        }
        entry.version += 1;

        debug!(instance_id = %id, from = ?from, to = ?to, "instance status transitioned");

        Ok(entry.clone())
    }

    async fn list_by_status(
        &self,
        status: InstanceStatus,
    ) -> Result<Vec<ApprovalInstance>, CoreError> {
        Ok(self
            .instances
            .iter()
            .filter(|entry| entry.status == status)
            .map(|entry| entry.clone())
            .collect())
    }
}
