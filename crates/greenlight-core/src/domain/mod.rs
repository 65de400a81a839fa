//! Domain model for the Greenlight engine
//!
//! Contains the approval instance aggregate, its lifecycle types, email
//! validation, and the store contract that persistence crates implement.

pub mod email;
pub mod instance;
pub mod store;

pub use email::validate_subject_email;
pub use instance::{
    ApprovalInstance, Decision, HistoryStep, InstanceId, InstanceStatus, StepKind, StepOutcome,
};
pub use store::InstanceStore;
