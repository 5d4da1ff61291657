//! HTTP handlers for materials
//!
//! - POST /api/v1/sessions/:id/materials  multipart upload (`file` field)
//! - GET  /api/v1/sessions/:id/materials  list materials

use super::service::MaterialService;
use super::types::MaterialRead;
use crate::auth::Principal;
use crate::error::Result;
use crate::upload::read_file_field;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct MaterialsState {
    pub service: Arc<MaterialService>,
}

pub fn materials_router(state: MaterialsState) -> Router {
    Router::new()
        .route(
            "/api/v1/sessions/:id/materials",
            post(upload_material).get(list_materials),
        )
        .with_state(state)
}

async fn upload_material(
    State(state): State<MaterialsState>,
    principal: Principal,
    Path(session_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let file = read_file_field(multipart).await?;
    let material = state
        .service
        .upload(session_id, principal.user_id, &file.filename, file.bytes)
        .await?;
    Ok((StatusCode::CREATED, Json(MaterialRead::from(material))))
}

async fn list_materials(
    State(state): State<MaterialsState>,
    principal: Principal,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<MaterialRead>>> {
    let materials = state.service.list(session_id, principal.user_id).await?;
    Ok(Json(materials.into_iter().map(MaterialRead::from).collect()))
}
