use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use futures_util::FutureExt;
use serde::Deserialize;
use tracing::{error, info};

use postbox_store::{ContactStore, STATUS_UPDATE_ACK, SUBMIT_ACK};
use postbox_types::api::{
    ContactMessageCreate, ContactMessageResponse, ContactMessagesResponse, HealthResponse,
    HealthStatus, StatusUpdateRequest, StatusUpdateResponse,
};

use crate::error::ApiError;

pub const SERVICE_NAME: &str = "contact_service";

pub type AppState = Arc<AppStateInner>;

/// Shared application state: one store client built at startup, injected into
/// every handler. Nothing else is shared between requests.
pub struct AppStateInner {
    pub store: Arc<dyn ContactStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/contact", post(submit_contact_message))
        .route("/contact/messages", get(get_all_contact_messages))
        .route(
            "/contact/messages/{message_id}/status",
            patch(update_contact_message_status),
        )
        .route("/contact/health", get(contact_health_check))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

/// Visitor submission. Shape validation runs first; an invalid payload is a
/// 422 and never reaches the store.
pub async fn submit_contact_message(
    State(state): State<AppState>,
    Json(req): Json<ContactMessageCreate>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    info!("Received contact message from: {}", req.email);
    let id = state
        .store
        .create_contact_message(&req.name, &req.email, &req.message)
        .await?;

    info!("Contact message saved successfully: {}", id);
    Ok((
        StatusCode::CREATED,
        Json(ContactMessageResponse {
            success: true,
            message: SUBMIT_ACK.to_string(),
            id: Some(id),
        }),
    ))
}

/// Admin listing, newest first, capped at `limit` (default 50).
pub async fn get_all_contact_messages(
    State(state): State<AppState>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<ContactMessagesResponse>, ApiError> {
    info!("Retrieving contact messages with limit: {}", query.limit);
    let messages = state.store.get_contact_messages(query.limit).await?;
    Ok(Json(ContactMessagesResponse {
        success: true,
        messages,
    }))
}

pub async fn update_contact_message_status(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<StatusUpdateResponse>, ApiError> {
    info!("Updating message {} status to: {}", message_id, req.status);
    state
        .store
        .update_message_status(&message_id, &req.status)
        .await?;

    Ok(Json(StatusUpdateResponse {
        success: true,
        message: STATUS_UPDATE_ACK.to_string(),
    }))
}

/// Health probe. Always an HTTP 200; degraded and unhealthy states live in
/// the body. A panicking probe is contained here rather than bubbling up to
/// the panic layer.
pub async fn contact_health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let probe = AssertUnwindSafe(state.store.test_connection())
        .catch_unwind()
        .await;

    let resp = match probe {
        Ok(connected) => HealthResponse {
            status: if connected {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            supabase_connected: connected,
            service: SERVICE_NAME.to_string(),
            error: None,
        },
        Err(panic) => {
            let detail = panic_detail(panic);
            error!("Health check failed: {}", detail);
            HealthResponse {
                status: HealthStatus::Unhealthy,
                supabase_connected: false,
                service: SERVICE_NAME.to_string(),
                error: Some(detail),
            }
        }
    };
    Json(resp)
}

pub fn panic_detail(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
