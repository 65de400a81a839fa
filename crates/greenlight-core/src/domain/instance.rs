use crate::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Approval instance status
///
/// Transitions are strictly forward-only:
/// `Created -> AwaitingDecision -> {Approved | Rejected}`, with `Failed`
/// reachable from any non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceStatus {
    /// Instance persisted, start notification not yet confirmed
    Created,

    /// Instance is suspended, waiting for an external decision
    AwaitingDecision,

    /// Decision resolved as approval (terminal)
    Approved,

    /// Decision resolved as rejection (terminal)
    Rejected,

    /// Instance hit an unrecoverable error (terminal)
    Failed,
}

impl InstanceStatus {
    /// Whether the status accepts no further external events
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InstanceStatus::Approved | InstanceStatus::Rejected | InstanceStatus::Failed
        )
    }

    /// Whether moving from `self` to `to` is a legal lifecycle edge
    pub fn can_transition_to(&self, to: InstanceStatus) -> bool {
        match (self, to) {
            (InstanceStatus::Created, InstanceStatus::AwaitingDecision) => true,
            (InstanceStatus::AwaitingDecision, InstanceStatus::Approved) => true,
            (InstanceStatus::AwaitingDecision, InstanceStatus::Rejected) => true,
            (from, InstanceStatus::Failed) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// Value object: approval instance ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub String);

impl InstanceId {
    /// Generate a fresh unique instance ID
    pub fn generate() -> Self {
        InstanceId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        InstanceId(id.to_string())
    }
}

/// The external decision that resolves a waiting instance.
///
/// Parsed from the wire token at the boundary; anything outside the closed
/// set is rejected before it reaches the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Approve the pending task
    Approve,

    /// Reject the pending task
    Reject,
}

impl Decision {
    /// Parse a decision token, case-insensitively.
    ///
    /// Fails with `InvalidApprovalEvent` for any unrecognized value, leaving
    /// the caller free to surface the error before touching instance state.
    pub fn parse(token: &str) -> Result<Self, CoreError> {
        if token.eq_ignore_ascii_case("approve") {
            Ok(Decision::Approve)
        } else if token.eq_ignore_ascii_case("reject") {
            Ok(Decision::Reject)
        } else {
            Err(CoreError::InvalidApprovalEvent(token.to_string()))
        }
    }

    /// The terminal status this decision drives the instance to
    pub fn target_status(&self) -> InstanceStatus {
        match self {
            Decision::Approve => InstanceStatus::Approved,
            Decision::Reject => InstanceStatus::Rejected,
        }
    }

    /// The notification step recorded when this decision is applied
    pub fn notification_step(&self) -> StepKind {
        match self {
            Decision::Approve => StepKind::NotifyApproved,
            Decision::Reject => StepKind::NotifyRejected,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Approve => write!(f, "Approve"),
            Decision::Reject => write!(f, "Reject"),
        }
    }
}

/// Kind of a recorded side-effecting step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    /// "process started" notification, sent before the suspend point
    #[serde(rename = "notify-start")]
    NotifyStart,

    /// Approval confirmation notification
    #[serde(rename = "notify-approved")]
    NotifyApproved,

    /// Rejection confirmation notification
    #[serde(rename = "notify-rejected")]
    NotifyRejected,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::NotifyStart => write!(f, "notify-start"),
            StepKind::NotifyApproved => write!(f, "notify-approved"),
            StepKind::NotifyRejected => write!(f, "notify-rejected"),
        }
    }
}

/// Result of a side-effecting step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// The notification was handed to the transport successfully
    Delivered,

    /// The transport reported failure; recorded, not retried by the step
    DeliveryFailed,
}

/// A recorded, replay-safe step in an instance's history.
///
/// Re-running the same logical step against the same instance must find the
/// existing record and skip the side effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStep {
    /// Step kind, unique per instance
    pub kind: StepKind,

    /// Notification recipient
    pub recipient: String,

    /// Notification subject line
    pub subject: String,

    /// Outcome observed when the step first executed
    pub outcome: StepOutcome,

    /// When the step was recorded
    pub timestamp: DateTime<Utc>,
}

impl HistoryStep {
    /// Record a step with the current timestamp
    pub fn new(kind: StepKind, recipient: &str, subject: &str, outcome: StepOutcome) -> Self {
        Self {
            kind,
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            outcome,
            timestamp: Utc::now(),
        }
    }
}

/// Aggregate: one run of the approval workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalInstance {
    /// Unique identifier, the correlation key for all later operations
    pub id: InstanceId,

    /// Email address the workflow was started for; immutable
    pub subject_email: String,

    /// Current lifecycle status
    pub status: InstanceStatus,

    /// Ordered, append-only record of executed steps
    pub history: Vec<HistoryStep>,

    /// Optimistic-concurrency version, bumped on every persisted mutation
    pub version: u64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Set when the instance reaches a terminal status
    pub completed_at: Option<DateTime<Utc>>,
}

impl ApprovalInstance {
    /// Create a new instance in `Created` status with a fresh ID
    pub fn new(subject_email: &str) -> Self {
        Self {
            id: InstanceId::generate(),
            subject_email: subject_email.to_string(),
            status: InstanceStatus::Created,
            history: Vec::new(),
            version: 0,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Whether a step of the given kind is already recorded
    #[inline]
    pub fn has_step(&self, kind: StepKind) -> bool {
        self.history.iter().any(|step| step.kind == kind)
    }

    /// The outcome recorded for a step kind, if any
    pub fn recorded_outcome(&self, kind: StepKind) -> Option<StepOutcome> {
        self.history
            .iter()
            .find(|step| step.kind == kind)
            .map(|step| step.outcome)
    }

    /// Whether the instance accepts no further external events
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_instance_creation() {
        let instance = ApprovalInstance::new("a@b.com");

        assert_eq!(instance.subject_email, "a@b.com");
        assert_eq!(instance.status, InstanceStatus::Created);
        assert!(instance.history.is_empty());
        assert_eq!(instance.version, 0);
        assert!(instance.completed_at.is_none());
        assert!(!instance.id.0.is_empty());
        assert!(instance.created_at <= Utc::now());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ApprovalInstance::new("a@b.com");
        let b = ApprovalInstance::new("a@b.com");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_legal_transitions() {
        assert!(InstanceStatus::Created.can_transition_to(InstanceStatus::AwaitingDecision));
        assert!(InstanceStatus::AwaitingDecision.can_transition_to(InstanceStatus::Approved));
        assert!(InstanceStatus::AwaitingDecision.can_transition_to(InstanceStatus::Rejected));
        assert!(InstanceStatus::Created.can_transition_to(InstanceStatus::Failed));
        assert!(InstanceStatus::AwaitingDecision.can_transition_to(InstanceStatus::Failed));
    }

    #[test]
    fn test_illegal_transitions() {
        // No regression and no skipping the suspend point
        assert!(!InstanceStatus::Created.can_transition_to(InstanceStatus::Approved));
        assert!(!InstanceStatus::Created.can_transition_to(InstanceStatus::Rejected));
        assert!(!InstanceStatus::AwaitingDecision.can_transition_to(InstanceStatus::Created));
        assert!(!InstanceStatus::Approved.can_transition_to(InstanceStatus::Rejected));
        assert!(!InstanceStatus::Rejected.can_transition_to(InstanceStatus::Approved));

        // Terminal statuses cannot even fail
        assert!(!InstanceStatus::Approved.can_transition_to(InstanceStatus::Failed));
        assert!(!InstanceStatus::Rejected.can_transition_to(InstanceStatus::Failed));
        assert!(!InstanceStatus::Failed.can_transition_to(InstanceStatus::Failed));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!InstanceStatus::Created.is_terminal());
        assert!(!InstanceStatus::AwaitingDecision.is_terminal());
        assert!(InstanceStatus::Approved.is_terminal());
        assert!(InstanceStatus::Rejected.is_terminal());
        assert!(InstanceStatus::Failed.is_terminal());
    }

    #[test]
    fn test_decision_parse_case_insensitive() {
        assert_eq!(Decision::parse("Approve").unwrap(), Decision::Approve);
        assert_eq!(Decision::parse("approve").unwrap(), Decision::Approve);
        assert_eq!(Decision::parse("APPROVE").unwrap(), Decision::Approve);
        assert_eq!(Decision::parse("Reject").unwrap(), Decision::Reject);
        assert_eq!(Decision::parse("rEjEcT").unwrap(), Decision::Reject);
    }

    #[test]
    fn test_decision_parse_rejects_unknown_tokens() {
        for token in ["Maybe", "", "approved", "yes", "Approve "] {
            match Decision::parse(token) {
                Err(CoreError::InvalidApprovalEvent(t)) => assert_eq!(t, token),
                other => panic!("Expected InvalidApprovalEvent, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_decision_targets() {
        assert_eq!(Decision::Approve.target_status(), InstanceStatus::Approved);
        assert_eq!(Decision::Reject.target_status(), InstanceStatus::Rejected);
        assert_eq!(Decision::Approve.notification_step(), StepKind::NotifyApproved);
        assert_eq!(Decision::Reject.notification_step(), StepKind::NotifyRejected);
    }

    #[test]
    fn test_history_lookup() {
        let mut instance = ApprovalInstance::new("a@b.com");
        assert!(!instance.has_step(StepKind::NotifyStart));
        assert_eq!(instance.recorded_outcome(StepKind::NotifyStart), None);

        instance.history.push(HistoryStep::new(
            StepKind::NotifyStart,
            "a@b.com",
            "Task Approval Started",
            StepOutcome::Delivered,
        ));

        assert!(instance.has_step(StepKind::NotifyStart));
        assert_eq!(
            instance.recorded_outcome(StepKind::NotifyStart),
            Some(StepOutcome::Delivered)
        );
        assert!(!instance.has_step(StepKind::NotifyApproved));
    }

    #[test]
    fn test_step_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&StepKind::NotifyStart).unwrap(),
            "\"notify-start\""
        );
        assert_eq!(
            serde_json::to_string(&StepKind::NotifyApproved).unwrap(),
            "\"notify-approved\""
        );
        assert_eq!(
            serde_json::to_string(&StepKind::NotifyRejected).unwrap(),
            "\"notify-rejected\""
        );
        assert_eq!(StepKind::NotifyStart.to_string(), "notify-start");
    }

    #[test]
    fn test_instance_serialization_round_trip() {
        let mut instance = ApprovalInstance::new("serialize@test.com");
        instance.history.push(HistoryStep::new(
            StepKind::NotifyStart,
            "serialize@test.com",
            "Task Approval Started",
            StepOutcome::Delivered,
        ));
        instance.status = InstanceStatus::AwaitingDecision;
        instance.version = 2;

        let serialized = serde_json::to_string(&instance).unwrap();
        let deserialized: ApprovalInstance = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized, instance);
    }
}
