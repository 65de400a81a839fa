use crate::domain::instance::InstanceStatus;
use thiserror::Error;

/// Core error type for the Greenlight engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A required field was missing or empty
    #[error("{0}")]
    InvalidInput(String),

    /// The subject email does not conform to the supported RFC 5322 subset
    #[error("The email address '{0}' is not valid.")]
    EmailValidationFailed(String),

    /// Approval instance not found
    #[error("Approval instance not found: {0}")]
    NotFound(String),

    /// A decision was applied to an instance whose status does not allow it
    #[error("Invalid transition for instance {instance_id}: {from:?} -> {to:?}")]
    InvalidTransition {
        /// Instance the transition was attempted on
        instance_id: String,
        /// Status the instance was actually in
        from: InstanceStatus,
        /// Status the caller tried to move it to
        to: InstanceStatus,
    },

    /// The instance was mutated between read and write
    #[error("Concurrent modification of instance {0}")]
    ConcurrentModification(String),

    /// Unrecognized decision token
    #[error("Unrecognized approval event: '{0}'")]
    InvalidApprovalEvent(String),

    /// Notification could not be delivered
    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),

    /// State store error
    #[error("State store error: {0}")]
    StateStore(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error
    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the error represents a conflict with the instance's current
    /// lifecycle state rather than bad input or a missing resource.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidTransition { .. } | CoreError::ConcurrentModification(_)
        )
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = vec![
            (
                CoreError::InvalidInput("User email cannot be null or empty.".to_string()),
                "User email cannot be null or empty.",
            ),
            (
                CoreError::EmailValidationFailed("broken".to_string()),
                "The email address 'broken' is not valid.",
            ),
            (
                CoreError::NotFound("abc-123".to_string()),
                "Approval instance not found: abc-123",
            ),
            (
                CoreError::InvalidApprovalEvent("Maybe".to_string()),
                "Unrecognized approval event: 'Maybe'",
            ),
            (
                CoreError::DeliveryFailed("smtp down".to_string()),
                "Notification delivery failed: smtp down",
            ),
            (
                CoreError::StateStore("lock poisoned".to_string()),
                "State store error: lock poisoned",
            ),
            (CoreError::Internal("other".to_string()), "other"),
        ];

        for (error, expected_msg) in errors {
            assert_eq!(error.to_string(), expected_msg);
        }
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = CoreError::InvalidTransition {
            instance_id: "i-1".to_string(),
            from: InstanceStatus::Approved,
            to: InstanceStatus::Rejected,
        };
        assert_eq!(
            err.to_string(),
            "Invalid transition for instance i-1: Approved -> Rejected"
        );
    }

    #[test]
    fn test_conflict_classification() {
        assert!(CoreError::ConcurrentModification("i-1".to_string()).is_conflict());
        assert!(CoreError::InvalidTransition {
            instance_id: "i-1".to_string(),
            from: InstanceStatus::Approved,
            to: InstanceStatus::Rejected,
        }
        .is_conflict());
        assert!(!CoreError::NotFound("i-1".to_string()).is_conflict());
        assert!(!CoreError::InvalidApprovalEvent("Maybe".to_string()).is_conflict());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error: CoreError = json_error.into();

        match error {
            CoreError::Serialization(msg) => {
                assert!(msg.contains("expected value"));
            }
            _ => panic!("Expected Serialization variant"),
        }
    }
}
