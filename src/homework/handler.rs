//! HTTP handlers for homework
//!
//! - POST /api/v1/sessions/:id/homework                      generate homework
//! - GET  /api/v1/sessions/:id/homework                      list session homework
//! - GET  /api/v1/homework/:id                               homework detail
//! - POST /api/v1/homework/:id/tasks/:task_id/upload         upload a task solution
//! - POST /api/v1/homework/:id/submit                        submit for grading
//! - POST /api/v1/homework/:id/grade                         grade a submission

use super::service::HomeworkService;
use super::types::{GenerateHomeworkRequest, HomeworkRead, TaskRead};
use crate::auth::Principal;
use crate::error::Result;
use crate::upload::read_file_field;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct HomeworkState {
    pub service: Arc<HomeworkService>,
}

pub fn homework_router(state: HomeworkState) -> Router {
    Router::new()
        .route(
            "/api/v1/sessions/:id/homework",
            post(generate_homework).get(list_homework),
        )
        .route("/api/v1/homework/:id", get(get_homework))
        .route(
            "/api/v1/homework/:id/tasks/:task_id/upload",
            post(upload_solution),
        )
        .route("/api/v1/homework/:id/submit", post(submit_homework))
        .route("/api/v1/homework/:id/grade", post(grade_homework))
        .with_state(state)
}

async fn generate_homework(
    State(state): State<HomeworkState>,
    principal: Principal,
    Path(session_id): Path<Uuid>,
    Json(request): Json<GenerateHomeworkRequest>,
) -> Result<impl IntoResponse> {
    let detail = state
        .service
        .generate(
            session_id,
            principal.user_id,
            &request.prompt,
            &request.material_ids,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(HomeworkRead::from(detail))))
}

async fn list_homework(
    State(state): State<HomeworkState>,
    principal: Principal,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<HomeworkRead>>> {
    let details = state
        .service
        .list_for_session(session_id, principal.user_id)
        .await?;
    Ok(Json(details.into_iter().map(HomeworkRead::from).collect()))
}

async fn get_homework(
    State(state): State<HomeworkState>,
    principal: Principal,
    Path(homework_id): Path<Uuid>,
) -> Result<Json<HomeworkRead>> {
    let detail = state.service.get(homework_id, principal.user_id).await?;
    Ok(Json(detail.into()))
}

async fn upload_solution(
    State(state): State<HomeworkState>,
    principal: Principal,
    Path((homework_id, task_id)): Path<(Uuid, Uuid)>,
    multipart: Multipart,
) -> Result<Json<TaskRead>> {
    let file = read_file_field(multipart).await?;
    let task = state
        .service
        .upload_solution(
            homework_id,
            task_id,
            principal.user_id,
            &file.filename,
            file.bytes,
        )
        .await?;
    Ok(Json(task.into()))
}

async fn submit_homework(
    State(state): State<HomeworkState>,
    principal: Principal,
    Path(homework_id): Path<Uuid>,
) -> Result<Json<HomeworkRead>> {
    let detail = state.service.submit(homework_id, principal.user_id).await?;
    Ok(Json(detail.into()))
}

async fn grade_homework(
    State(state): State<HomeworkState>,
    principal: Principal,
    Path(homework_id): Path<Uuid>,
) -> Result<Json<HomeworkRead>> {
    let detail = state.service.grade(homework_id, principal.user_id).await?;
    Ok(Json(detail.into()))
}
