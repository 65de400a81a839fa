//! API module for the Greenlight server
//!
//! Contains the router and handlers for the control-plane API: three
//! operations mapping 1:1 to the engine, plus a health check.

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod approvals;
pub mod errors;
pub mod health;

use crate::server::ApprovalServer;

/// Build the router for the control API
pub fn build_router(server: Arc<ApprovalServer>) -> Router {
    Router::new()
        // Approval workflow control
        .route("/v1/approvals/start", post(approvals::start_approval_handler))
        .route("/v1/approvals/approve", post(approvals::approve_handler))
        .route("/v1/approvals/reject", post(approvals::reject_handler))
        // Health check
        .route("/health", get(health::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}
