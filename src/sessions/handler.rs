//! HTTP handlers for sessions and chat
//!
//! - POST /api/v1/sessions               create session
//! - GET  /api/v1/sessions               list own sessions
//! - POST /api/v1/sessions/:id/messages  send a chat message
//! - GET  /api/v1/sessions/:id/messages  chat log
//! - POST /api/v1/logout                 clear own chat history

use super::service::ChatService;
use super::types::*;
use crate::auth::Principal;
use crate::error::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

/// Shared state for session handlers
#[derive(Clone)]
pub struct SessionsState {
    pub service: Arc<ChatService>,
}

pub fn sessions_router(state: SessionsState) -> Router {
    Router::new()
        .route("/api/v1/sessions", post(create_session).get(list_sessions))
        .route(
            "/api/v1/sessions/:id/messages",
            post(send_message).get(list_messages),
        )
        .route("/api/v1/logout", post(logout))
        .with_state(state)
}

async fn create_session(
    State(state): State<SessionsState>,
    principal: Principal,
    Json(request): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse> {
    let session = state
        .service
        .create_session(principal.user_id, &request.title)
        .await?;
    Ok((StatusCode::CREATED, Json(SessionRead::from(session))))
}

async fn list_sessions(
    State(state): State<SessionsState>,
    principal: Principal,
) -> Result<Json<Vec<SessionRead>>> {
    let sessions = state.service.list_sessions(principal.user_id).await?;
    Ok(Json(sessions.into_iter().map(SessionRead::from).collect()))
}

async fn send_message(
    State(state): State<SessionsState>,
    principal: Principal,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<MessageRead>> {
    let reply = state
        .service
        .send_message(session_id, principal.user_id, &request.content)
        .await?;
    Ok(Json(reply.into()))
}

async fn list_messages(
    State(state): State<SessionsState>,
    principal: Principal,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<MessageRead>>> {
    let messages = state
        .service
        .list_messages(session_id, principal.user_id)
        .await?;
    Ok(Json(messages.into_iter().map(MessageRead::from).collect()))
}

async fn logout(
    State(state): State<SessionsState>,
    principal: Principal,
) -> Result<Json<ClearHistoryResponse>> {
    let deleted_messages = state.service.clear_history(principal.user_id).await?;
    Ok(Json(ClearHistoryResponse { deleted_messages }))
}
