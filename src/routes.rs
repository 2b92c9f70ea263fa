use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    routing::any,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::{
    error::SecretError,
    gateway::SecretStoreGateway,
    http_objects::{ApiError, LinkResponse, ResponseSettings},
};

#[derive(Clone)]
pub struct RouteState {
    pub gateway: Arc<SecretStoreGateway>,
    pub responses: Arc<ResponseSettings>,
    pub max_secret_bytes: usize,
}

pub fn create_routes(route_state: RouteState) -> Router {
    let max_secret_bytes = route_state.max_secret_bytes;
    Router::new()
        .route("/", any(submit_secret))
        .fallback(submit_secret)
        .layer(DefaultBodyLimit::max(max_secret_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(route_state)
}

/// Store the request body and answer with a link to it.
///
/// Every path and method lands here; a request without a body is answered
/// with the empty-request failure and the usage banner.
pub async fn submit_secret(
    State(state): State<RouteState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<LinkResponse, ApiError> {
    let body = body.map_err(|rejection| {
        ApiError::new(
            SecretError::PayloadRejected {
                reason: rejection.body_text(),
            },
            &state.responses,
        )
    })?;

    let submission = state
        .gateway
        .submit(body)
        .await
        .map_err(|e| ApiError::new(e, &state.responses))?;
    debug!(
        key = %submission.key,
        written = submission.written,
        "responding with link"
    );

    Ok(LinkResponse(submission.link.url))
}

