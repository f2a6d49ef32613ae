/// Contact form endpoint
use axum::{Json, body::Bytes, extract::State, http::Method};
use contactflow_core::constants::MSG_SUCCESS;
use contactflow_core::models::ContactForm;
use contactflow_core::utils::logging::safe_submission_context;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{context::ContactContext, error::ApiError};

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

/// Accepts a contact form submission.
///
/// Configuration is checked before the body so a misconfigured deployment
/// never touches the store. The notification step is best-effort and its
/// outcome does not change the response.
pub async fn submit(
    State(ctx): State<Arc<ContactContext>>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError> {
    let config = ctx.settings.require().map_err(|e| {
        error!(error = %e, "Missing required environment variables");
        e
    })?;

    let submission = ContactForm::from_slice(&body)
        .and_then(ContactForm::into_submission)
        .map_err(|e| {
            warn!(body_len = body.len(), "Rejected contact form with missing fields");
            e
        })?;

    info!(submission = %safe_submission_context(&submission), "Contact form received");

    ctx.gateway
        .save(&config.mongo_uri, &submission)
        .await
        .map_err(|e| {
            error!(error = %e, "Contact form error");
            e
        })?;

    let report = ctx.dispatcher.dispatch(&config, &submission).await;
    report.log();

    Ok(Json(SubmitResponse {
        success: true,
        message: MSG_SUCCESS.to_string(),
    }))
}

/// Any method other than POST on the contact route
pub async fn method_not_allowed(method: Method) -> ApiError {
    warn!(method = %method, "Method not allowed on contact endpoint");
    ApiError::MethodNotAllowed
}
