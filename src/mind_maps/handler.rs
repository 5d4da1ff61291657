//! HTTP handlers for mind maps
//!
//! - POST /api/v1/sessions/:id/mind-maps  generate a mind map
//! - GET  /api/v1/sessions/:id/mind-maps  list mind maps

use super::service::MindMapService;
use super::types::MindMapRead;
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

#[derive(Clone)]
pub struct MindMapsState {
    pub service: Arc<MindMapService>,
}

pub fn mind_maps_router(state: MindMapsState) -> Router {
    Router::new()
        .route(
            "/api/v1/sessions/:id/mind-maps",
            post(generate_mind_map).get(list_mind_maps),
        )
        .with_state(state)
}

async fn generate_mind_map(
    State(state): State<MindMapsState>,
    principal: Principal,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let mind_map = state
        .service
        .generate(session_id, principal.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(MindMapRead::from(mind_map))))
}

async fn list_mind_maps(
    State(state): State<MindMapsState>,
    principal: Principal,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<MindMapRead>>> {
    let maps = state.service.list(session_id, principal.user_id).await?;
    Ok(Json(maps.into_iter().map(MindMapRead::from).collect()))
}
