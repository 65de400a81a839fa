//! Handlers for the three control operations: start, approve, reject.
//!
//! Each handler validates presence of its required field, delegates to the
//! engine, and echoes a small JSON body. Missing fields surface as the same
//! typed errors the engine raises for empty values, so clients see one
//! consistent 400 shape.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::errors::ApiError;
use crate::server::ApprovalServer;

/// Confirmation message for a delivered approval decision
pub const APPROVED_MESSAGE: &str = "Approval event sent.";

/// Confirmation message for a delivered rejection decision
pub const REJECTED_MESSAGE: &str = "Rejection event sent.";

/// Request body for starting an approval workflow
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartApprovalRequest {
    /// Email address the workflow is started for
    #[serde(default)]
    pub subject_email: Option<String>,
}

/// Request body for delivering a decision
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    /// Instance the decision targets
    #[serde(default)]
    pub instance_id: Option<String>,
}

/// Handler for `POST /v1/approvals/start`
pub async fn start_approval_handler(
    State(server): State<Arc<ApprovalServer>>,
    Json(request): Json<StartApprovalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let subject_email = request.subject_email.unwrap_or_default();

    let instance = server.start_approval(&subject_email).await?;

    info!(instance_id = %instance.id, "started approval via control API");

    Ok(Json(json!({
        "instanceId": instance.id.0,
        "subjectEmail": instance.subject_email,
        "status": "Started",
    })))
}

/// Handler for `POST /v1/approvals/approve`
pub async fn approve_handler(
    State(server): State<Arc<ApprovalServer>>,
    Json(request): Json<DecisionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let instance_id = request.instance_id.unwrap_or_default();

    server.approve(&instance_id).await?;

    Ok(Json(json!({ "message": APPROVED_MESSAGE })))
}

/// Handler for `POST /v1/approvals/reject`
pub async fn reject_handler(
    State(server): State<Arc<ApprovalServer>>,
    Json(request): Json<DecisionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let instance_id = request.instance_id.unwrap_or_default();

    server.reject(&instance_id).await?;

    Ok(Json(json!({ "message": REJECTED_MESSAGE })))
}
