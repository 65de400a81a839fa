//! Application services for the Greenlight engine

pub mod activity;
pub mod engine;

pub use activity::{ActivityExecutor, Notifier};
pub use engine::{ApprovalEngine, SignalOutcome};
