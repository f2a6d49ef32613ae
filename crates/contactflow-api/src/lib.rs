/// Contactflow API - Contact form intake Lambda
///
/// This module contains the HTTP surface of the contact endpoint: routing,
/// CORS, request logging and the Lambda adapter.
pub mod api;
pub mod context;
pub mod error;
pub mod middleware;

pub use context::ContactContext;
pub use error::ApiError;

use axum::{
    Router,
    body::Body as AxumBody,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::post,
};
use contactflow_core::models::CorsSettings;
use lambda_http::{Body, Error as LambdaError, Request, Response};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

/// CORS policy for the configured site.
///
/// The layer answers every OPTIONS request itself, so preflights never
/// reach a handler.
pub fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    let methods: Vec<Method> = settings
        .allow_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods(methods)
        .allow_headers([header::CONTENT_TYPE]);

    match HeaderValue::from_str(&settings.allowed_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!(
                origin = %settings.allowed_origin,
                error = %e,
                "Ignoring invalid allowed origin"
            );
            layer
        }
    }
}

/// Build the contact router
pub fn build_router(ctx: Arc<ContactContext>) -> Router {
    let contact = post(api::contact::submit).fallback(api::contact::method_not_allowed);

    Router::new()
        .route("/contact", contact.clone())
        // Legacy path kept for deployed forms
        .route("/api/contact", contact)
        .route_layer(axum_middleware::from_fn_with_state(
            Arc::clone(&ctx),
            middleware::logging_middleware,
        ))
        .layer(cors_layer(&ctx.settings.cors))
        .with_state(ctx)
}

/// Lambda caps synchronous response payloads at 6 MB
const MAX_RESPONSE_BYTES: usize = 6 * 1024 * 1024;

/// Main handler - converts Lambda HTTP request to Axum router
pub async fn handler(
    ctx: Arc<ContactContext>,
    event: Request,
) -> Result<Response<Body>, LambdaError> {
    info!("Processing contact request: {} {}", event.method(), event.uri());

    let app = build_router(ctx);

    // Convert Lambda HTTP request to Axum request
    let (parts, body) = event.into_parts();
    let body_bytes = body.to_vec();

    let axum_request = http::Request::from_parts(parts, AxumBody::from(body_bytes));

    match app.oneshot(axum_request).await {
        Ok(response) => into_lambda_response(response, MAX_RESPONSE_BYTES).await,
        Err(err) => {
            error!("Axum router error: {}", err);
            internal_error()
        }
    }
}

/// Converts an Axum response into a Lambda response, buffering at most `limit` bytes
async fn into_lambda_response(
    response: axum::response::Response,
    limit: usize,
) -> Result<Response<Body>, LambdaError> {
    let (parts, body) = response.into_parts();

    match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => Ok(Response::from_parts(parts, Body::from(bytes.to_vec()))),
        Err(err) => {
            error!(status = %parts.status, error = %err, "Failed to read router response body");
            internal_error()
        }
    }
}

fn internal_error() -> Result<Response<Body>, LambdaError> {
    let response = Response::builder().status(500).body(Body::from(
        serde_json::json!({
            "error": "Internal server error"
        })
        .to_string(),
    ))?;
    Ok(response)
}
