//! HTTP handlers for lessons
//!
//! - GET /api/v1/sessions/:id/lessons  list lessons (read-only)

use super::store::LessonStore;
use super::types::LessonRead;
use crate::auth::Principal;
use crate::error::Result;
use crate::sessions::SessionStore;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct LessonsState {
    pub sessions: SessionStore,
    pub lessons: LessonStore,
}

pub fn lessons_router(state: LessonsState) -> Router {
    Router::new()
        .route("/api/v1/sessions/:id/lessons", get(list_lessons))
        .with_state(state)
}

async fn list_lessons(
    State(state): State<LessonsState>,
    principal: Principal,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<LessonRead>>> {
    state
        .sessions
        .require_owned(session_id, principal.user_id)
        .await?;
    let lessons = state.lessons.list_for_session(session_id).await?;
    Ok(Json(lessons.into_iter().map(LessonRead::from).collect()))
}
