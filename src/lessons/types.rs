//! Wire types for the lessons API

use crate::entity::{lesson, LessonStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRead {
    pub id: Uuid,
    pub session_id: Uuid,
    pub title: String,
    pub progress: i32,
    pub current_step: i32,
    pub total_steps: i32,
    pub status: LessonStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<lesson::Model> for LessonRead {
    fn from(model: lesson::Model) -> Self {
        Self {
            id: model.id,
            session_id: model.session_id,
            title: model.title,
            progress: model.progress,
            current_step: model.current_step,
            total_steps: model.total_steps,
            status: model.status,
            created_at: model.created_at,
            completed_at: model.completed_at,
        }
    }
}
