use super::protocol::{
    InsertRequest, MessageResponse, SuggestParams, ENDPOINT_INSERT, ENDPOINT_ROOT,
    ENDPOINT_STATS, ENDPOINT_SUGGEST, ROOT_MESSAGE,
};
use super::service::AutocompleteService;
use super::types::ServiceStats;

use axum::extract::{FromRequest, Query, Request};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Form, Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Routes of the suggestion API, with the service injected as an extension.
///
/// Any origin may call the API, so browser clients served from elsewhere work.
pub fn router(service: Arc<AutocompleteService>) -> Router {
    Router::new()
        .route(ENDPOINT_ROOT, get(handle_root))
        .route(ENDPOINT_SUGGEST, get(handle_suggest))
        .route(ENDPOINT_INSERT, post(handle_insert))
        .route(ENDPOINT_STATS, get(handle_stats))
        .layer(Extension(service))
        .layer(CorsLayer::permissive())
}

pub async fn handle_root() -> (StatusCode, Json<&'static str>) {
    (StatusCode::OK, Json(ROOT_MESSAGE))
}

pub async fn handle_suggest(
    Extension(service): Extension<Arc<AutocompleteService>>,
    Query(params): Query<SuggestParams>,
) -> Response {
    let prefix = match params.p {
        Some(p) if !p.is_empty() => p,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new("Prefix not provided")),
            )
                .into_response();
        }
    };

    tracing::debug!("Got query: {}", prefix);

    match service.suggest(&prefix).await {
        Ok(suggestions) => (StatusCode::OK, Json(suggestions)).into_response(),
        Err(e) => {
            tracing::warn!("Rejected suggest request: {}", e);
            not_ready()
        }
    }
}

pub async fn handle_insert(
    Extension(service): Extension<Arc<AutocompleteService>>,
    request: Request,
) -> (StatusCode, Json<MessageResponse>) {
    let word = match read_insert_request(request).await.and_then(|req| req.word) {
        Some(word) if !word.is_empty() => word,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new("Word not provided")),
            );
        }
    };

    // Store failures are handled by the write-through queue and never reach here.
    match service.record_occurrence(&word).await {
        Ok(frequency) => {
            tracing::debug!("Word '{}' added (frequency={:?})", word, frequency);
            (
                StatusCode::OK,
                Json(MessageResponse::new(format!("Added {}", word))),
            )
        }
        Err(e) => {
            tracing::warn!("Rejected insert request: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(MessageResponse::new("Service not ready")),
            )
        }
    }
}

pub async fn handle_stats(
    Extension(service): Extension<Arc<AutocompleteService>>,
) -> (StatusCode, Json<ServiceStats>) {
    (StatusCode::OK, Json(service.stats().await))
}

/// Accepts the word as a JSON body or as a url-encoded form.
async fn read_insert_request(request: Request) -> Option<InsertRequest> {
    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);

    if is_form {
        match Form::<InsertRequest>::from_request(request, &()).await {
            Ok(Form(req)) => Some(req),
            Err(e) => {
                tracing::debug!("Unreadable form body: {}", e);
                None
            }
        }
    } else {
        match Json::<InsertRequest>::from_request(request, &()).await {
            Ok(Json(req)) => Some(req),
            Err(e) => {
                tracing::debug!("Unreadable JSON body: {}", e);
                None
            }
        }
    }
}

fn not_ready() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(MessageResponse::new("Service not ready")),
    )
        .into_response()
}
