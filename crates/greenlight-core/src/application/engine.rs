//! Approval workflow engine
//!
//! The state machine that advances an instance through its lifecycle:
//! validate input, run the start notification, suspend by persisting
//! `AwaitingDecision`, and later resolve the instance when a decision
//! arrives as an independent invocation. No thread ever blocks while an
//! instance is waiting; execution state lives entirely in the store.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::activity::ActivityExecutor;
use crate::domain::email::validate_subject_email;
use crate::domain::instance::{
    ApprovalInstance, Decision, HistoryStep, InstanceId, InstanceStatus, StepKind,
};
use crate::domain::store::InstanceStore;
use crate::CoreError;

/// User-facing message for a missing instance ID, kept stable for API clients
pub const EMPTY_INSTANCE_ID_MESSAGE: &str = "Instance ID is required.";

/// Attempts to win the versioned history append before giving up
const MAX_APPEND_ATTEMPTS: usize = 3;

/// Result of delivering a decision to an instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalOutcome {
    /// The decision was applied and the instance reached its terminal status
    Completed {
        /// Instance after the transition and notification step
        instance: ApprovalInstance,
        /// Decision that was applied
        decision: Decision,
    },

    /// The instance had already reached this decision's terminal status;
    /// redelivery of the same decision is an idempotent no-op
    AlreadyCompleted {
        /// Instance as it stood
        instance: ApprovalInstance,
        /// Decision that was redelivered
        decision: Decision,
    },
}

impl SignalOutcome {
    /// The instance the outcome refers to
    pub fn instance(&self) -> &ApprovalInstance {
        match self {
            SignalOutcome::Completed { instance, .. } => instance,
            SignalOutcome::AlreadyCompleted { instance, .. } => instance,
        }
    }
}

/// The durable orchestration core for the approval workflow
pub struct ApprovalEngine {
    store: Arc<dyn InstanceStore>,
    executor: ActivityExecutor,
}

impl ApprovalEngine {
    /// Create an engine over a store and an activity executor
    pub fn new(store: Arc<dyn InstanceStore>, executor: ActivityExecutor) -> Self {
        Self { store, executor }
    }

    /// Start a new approval instance for the given email.
    ///
    /// Validates the email, persists the instance, sends the
    /// "process started" notification as history step `notify-start`, and
    /// suspends by transitioning to `AwaitingDecision`. The notification
    /// runs before the suspend point: a restart between the two leaves the
    /// instance in `Created` with the step recorded, and `resume` picks it
    /// up without re-sending.
    pub async fn start(&self, subject_email: &str) -> Result<ApprovalInstance, CoreError> {
        validate_subject_email(subject_email)?;

        let instance = self.store.create(subject_email).await?;
        info!(instance_id = %instance.id, "started approval instance");

        let instance = self.run_notification(instance, StepKind::NotifyStart).await?;

        self.store
            .transition(
                &instance.id,
                InstanceStatus::Created,
                InstanceStatus::AwaitingDecision,
            )
            .await
    }

    /// Deliver a decision to a waiting instance.
    ///
    /// The decision token is parsed before any state is read, so an
    /// unrecognized token never touches the instance. Redelivering the
    /// decision an instance already resolved to is an idempotent no-op;
    /// a conflicting decision on a resolved instance is an
    /// `InvalidTransition` conflict.
    pub async fn signal(
        &self,
        instance_id: &str,
        decision_token: &str,
    ) -> Result<SignalOutcome, CoreError> {
        if instance_id.is_empty() {
            return Err(CoreError::InvalidInput(EMPTY_INSTANCE_ID_MESSAGE.to_string()));
        }

        let decision = Decision::parse(decision_token)?;
        let id = InstanceId::from(instance_id);
        let target = decision.target_status();

        let instance = self.require_instance(&id).await?;

        if instance.status == target {
            debug!(
                instance_id = %id,
                decision = %decision,
                "decision redelivered to resolved instance"
            );
            // A crash between the transition and the notification append
            // leaves the step missing; redelivery completes it. With the
            // step recorded this is a pure no-op.
            let instance = self
                .run_notification(instance, decision.notification_step())
                .await?;
            return Ok(SignalOutcome::AlreadyCompleted { instance, decision });
        }

        match self
            .store
            .transition(&id, InstanceStatus::AwaitingDecision, target)
            .await
        {
            Ok(instance) => {
                info!(instance_id = %id, decision = %decision, "approval instance resolved");
                let instance = self
                    .run_notification(instance, decision.notification_step())
                    .await?;
                Ok(SignalOutcome::Completed { instance, decision })
            }
            // Lost the race to an identical decision; the original outcome stands
            Err(CoreError::InvalidTransition { from, .. }) if from == target => {
                let instance = self.require_instance(&id).await?;
                let instance = self
                    .run_notification(instance, decision.notification_step())
                    .await?;
                Ok(SignalOutcome::AlreadyCompleted { instance, decision })
            }
            Err(err) => Err(err),
        }
    }

    /// Re-drive an instance that a restart left mid-step.
    ///
    /// An instance still in `Created` replays the start path: the recorded
    /// `notify-start` step short-circuits the send, then the suspend
    /// transition completes. A terminal instance missing its decision step
    /// was interrupted between the transition and the notification append;
    /// the step is replayed the same way. Anything else needs nothing.
    pub async fn resume(&self, id: &InstanceId) -> Result<ApprovalInstance, CoreError> {
        let instance = self.require_instance(id).await?;

        match instance.status {
            InstanceStatus::Created => {
                info!(instance_id = %id, "resuming instance interrupted before suspend point");
                let instance = self.run_notification(instance, StepKind::NotifyStart).await?;
                self.store
                    .transition(
                        &instance.id,
                        InstanceStatus::Created,
                        InstanceStatus::AwaitingDecision,
                    )
                    .await
            }
            InstanceStatus::Approved => {
                self.run_notification(instance, StepKind::NotifyApproved).await
            }
            InstanceStatus::Rejected => {
                self.run_notification(instance, StepKind::NotifyRejected).await
            }
            _ => Ok(instance),
        }
    }

    /// Resume every instance a restart left mid-step.
    ///
    /// Covers both crash windows: instances still in `Created` (interrupted
    /// before the suspend point) and terminal instances whose decision
    /// notification never made it into history. Called once at process
    /// startup. Returns the number of instances resumed; individual
    /// failures are logged and skipped so one bad record cannot block
    /// recovery of the rest.
    pub async fn recover_in_flight(&self) -> Result<usize, CoreError> {
        let mut interrupted = self.store.list_by_status(InstanceStatus::Created).await?;
        for (status, step) in [
            (InstanceStatus::Approved, StepKind::NotifyApproved),
            (InstanceStatus::Rejected, StepKind::NotifyRejected),
        ] {
            interrupted.extend(
                self.store
                    .list_by_status(status)
                    .await?
                    .into_iter()
                    .filter(|instance| !instance.has_step(step)),
            );
        }
        let mut resumed = 0;

        for instance in interrupted {
            match self.resume(&instance.id).await {
                Ok(_) => resumed += 1,
                Err(err) => {
                    warn!(instance_id = %instance.id, error = %err, "failed to resume instance");
                }
            }
        }

        if resumed > 0 {
            info!(count = resumed, "resumed in-flight approval instances");
        }

        Ok(resumed)
    }

    async fn require_instance(&self, id: &InstanceId) -> Result<ApprovalInstance, CoreError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    /// Execute a notification step and record it in history, effectively-once.
    ///
    /// A step already present in history is returned as-is. The versioned
    /// append may lose to a concurrent writer; in that case the instance is
    /// re-read, and if the step appeared in the meantime the other writer's
    /// record wins.
    async fn run_notification(
        &self,
        instance: ApprovalInstance,
        kind: StepKind,
    ) -> Result<ApprovalInstance, CoreError> {
        let mut instance = instance;

        for _ in 0..MAX_APPEND_ATTEMPTS {
            if instance.has_step(kind) {
                return Ok(instance);
            }

            let outcome = self.executor.notify(&instance, kind).await?;
            let (subject, _) = crate::application::activity::templates::for_step(kind);
            let step = HistoryStep::new(kind, &instance.subject_email, subject, outcome);

            match self
                .store
                .append_step(&instance.id, instance.version, step, None)
                .await
            {
                Ok(updated) => return Ok(updated),
                Err(CoreError::ConcurrentModification(_)) => {
                    instance = self.require_instance(&instance.id).await?;
                }
                Err(err) => return Err(err),
            }
        }

        Err(CoreError::ConcurrentModification(instance.id.to_string()))
    }
}
