//! Wire types for the homework API

use super::store::{HomeworkDetail, TaskDetail};
use crate::entity::{homework_review, homework_task, homework_task_review, Grade, HomeworkStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for generating homework
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateHomeworkRequest {
    pub prompt: String,
    #[serde(default)]
    pub material_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeworkRead {
    pub id: Uuid,
    pub session_id: Uuid,
    pub title: String,
    pub status: HomeworkStatus,
    pub generated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub tasks: Vec<TaskRead>,
    pub reviews: Vec<ReviewRead>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRead {
    pub id: Uuid,
    pub homework_id: Uuid,
    pub task_number: i32,
    pub description: String,
    pub uploaded_file_url: Option<String>,
    #[serde(default)]
    pub reviews: Vec<TaskReviewRead>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReviewRead {
    pub id: Uuid,
    pub task_feedback: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRead {
    pub id: Uuid,
    pub grade: Option<Grade>,
    pub overall_feedback: Option<String>,
    pub reviewed_at: DateTime<Utc>,
    pub reviewed_by: Option<String>,
}

impl From<HomeworkDetail> for HomeworkRead {
    fn from(detail: HomeworkDetail) -> Self {
        let HomeworkDetail {
            homework,
            tasks,
            reviews,
        } = detail;
        Self {
            id: homework.id,
            session_id: homework.session_id,
            title: homework.title,
            status: homework.status,
            generated_at: homework.generated_at,
            submitted_at: homework.submitted_at,
            tasks: tasks.into_iter().map(TaskRead::from).collect(),
            reviews: reviews.into_iter().map(ReviewRead::from).collect(),
        }
    }
}

impl From<TaskDetail> for TaskRead {
    fn from(detail: TaskDetail) -> Self {
        let mut task = TaskRead::from(detail.task);
        task.reviews = detail
            .reviews
            .into_iter()
            .map(TaskReviewRead::from)
            .collect();
        task
    }
}

impl From<homework_task::Model> for TaskRead {
    fn from(task: homework_task::Model) -> Self {
        Self {
            id: task.id,
            homework_id: task.homework_id,
            task_number: task.task_number,
            description: task.description,
            uploaded_file_url: task.uploaded_file_url,
            reviews: Vec::new(),
        }
    }
}

impl From<homework_task_review::Model> for TaskReviewRead {
    fn from(review: homework_task_review::Model) -> Self {
        Self {
            id: review.id,
            task_feedback: review.task_feedback,
            score: review.score,
        }
    }
}

impl From<homework_review::Model> for ReviewRead {
    fn from(review: homework_review::Model) -> Self {
        Self {
            id: review.id,
            grade: review.grade,
            overall_feedback: review.overall_feedback,
            reviewed_at: review.reviewed_at,
            reviewed_by: review.reviewed_by,
        }
    }
}
