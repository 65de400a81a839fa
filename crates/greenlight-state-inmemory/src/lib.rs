//! In-memory instance store for the Greenlight platform
//!
//! This crate provides an in-memory implementation of the
//! [`InstanceStore`](greenlight_core::InstanceStore) contract defined in
//! greenlight-core. It is primarily useful for development, testing, and
//! single-process deployments where persistence across restarts is not
//! required; a database-backed implementation slots in behind the same
//! trait.

pub mod store;

pub use store::InMemoryInstanceStore;
