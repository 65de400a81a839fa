//! Greenlight Core
//!
//! The durable orchestration core for the human-approval workflow: a
//! requester starts an instance tied to an email address, the instance
//! suspends until an out-of-band decision arrives, and on decision it
//! performs a one-time notification and terminates.
//!
//! The crate is organized the same way as the wider platform:
//!
//! - `domain` holds the approval instance aggregate, its lifecycle types,
//!   and the [`InstanceStore`] contract persistence crates implement.
//! - `application` holds the [`ApprovalEngine`] state machine and the
//!   [`ActivityExecutor`] that makes notification steps effectively-once.
//!
//! Durability is carried by persisted `(status, history)` plus the store's
//! compare-and-swap transition primitive, never by an in-memory
//! continuation: suspension means persisting `AwaitingDecision` and
//! returning control, and the eventual decision is a completely
//! independent invocation.

pub mod application;
pub mod domain;
pub mod error;

pub use application::activity::{templates, ActivityExecutor, Notifier};
pub use application::engine::{ApprovalEngine, SignalOutcome, EMPTY_INSTANCE_ID_MESSAGE};
pub use domain::email::{validate_subject_email, EMPTY_EMAIL_MESSAGE};
pub use domain::instance::{
    ApprovalInstance, Decision, HistoryStep, InstanceId, InstanceStatus, StepKind, StepOutcome,
};
pub use domain::store::InstanceStore;
pub use error::CoreError;
