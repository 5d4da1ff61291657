//! Homework, task and review persistence
//!
//! Status changes are conditional updates so that concurrent requests can
//! never move a homework backwards or grade it twice.

use crate::entity::{
    homework, homework_review, homework_task, homework_task_review, Grade, HomeworkStatus,
};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

/// A task with the reviews written for it
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDetail {
    pub task: homework_task::Model,
    pub reviews: Vec<homework_task_review::Model>,
}

/// A homework with its tasks and reviews loaded
#[derive(Debug, Clone, PartialEq)]
pub struct HomeworkDetail {
    pub homework: homework::Model,
    pub tasks: Vec<TaskDetail>,
    pub reviews: Vec<homework_review::Model>,
}

/// Outcome of one grading pass, matched to task ids
#[derive(Debug, Clone)]
pub struct GradingRecord {
    pub grade: Grade,
    pub overall_feedback: String,
    pub reviewed_by: String,
    pub task_reviews: Vec<TaskReviewRecord>,
}

#[derive(Debug, Clone)]
pub struct TaskReviewRecord {
    pub task_id: Uuid,
    pub feedback: String,
    pub score: f64,
}

#[derive(Clone)]
pub struct HomeworkStore {
    db: DatabaseConnection,
}

impl HomeworkStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a pending homework and its tasks numbered from 1, atomically
    pub async fn create_with_tasks(
        &self,
        session_id: Uuid,
        title: &str,
        descriptions: &[String],
    ) -> Result<homework::Model> {
        let txn = self.db.begin().await?;

        let homework = homework::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(session_id),
            title: Set(title.to_string()),
            status: Set(HomeworkStatus::Pending),
            generated_at: Set(Utc::now()),
            submitted_at: Set(None),
        }
        .insert(&txn)
        .await?;

        for (number, description) in (1..).zip(descriptions) {
            homework_task::ActiveModel {
                id: Set(Uuid::new_v4()),
                homework_id: Set(homework.id),
                task_number: Set(number),
                description: Set(description.clone()),
                uploaded_file_url: Set(None),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(homework)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<homework::Model>> {
        Ok(homework::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Homework of a session, newest first
    pub async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<homework::Model>> {
        Ok(homework::Entity::find()
            .filter(homework::Column::SessionId.eq(session_id))
            .order_by_desc(homework::Column::GeneratedAt)
            .all(&self.db)
            .await?)
    }

    /// Tasks of a homework ordered by number
    pub async fn tasks(&self, homework_id: Uuid) -> Result<Vec<homework_task::Model>> {
        Ok(homework_task::Entity::find()
            .filter(homework_task::Column::HomeworkId.eq(homework_id))
            .order_by_asc(homework_task::Column::TaskNumber)
            .all(&self.db)
            .await?)
    }

    pub async fn get_task(&self, task_id: Uuid) -> Result<Option<homework_task::Model>> {
        Ok(homework_task::Entity::find_by_id(task_id)
            .one(&self.db)
            .await?)
    }

    /// Record the uploaded solution's display name on a task
    pub async fn set_task_upload(
        &self,
        task: homework_task::Model,
        filename: &str,
    ) -> Result<homework_task::Model> {
        let mut active: homework_task::ActiveModel = task.into();
        active.uploaded_file_url = Set(Some(filename.to_string()));
        Ok(active.update(&self.db).await?)
    }

    /// Move `pending | submitted` to `submitted`, stamping `submitted_at`.
    ///
    /// Returns false when the homework is already graded.
    pub async fn mark_submitted(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool> {
        let result = homework::Entity::update_many()
            .col_expr(
                homework::Column::Status,
                Expr::value(HomeworkStatus::Submitted),
            )
            .col_expr(homework::Column::SubmittedAt, Expr::value(Some(at)))
            .filter(homework::Column::Id.eq(id))
            .filter(homework::Column::Status.ne(HomeworkStatus::Graded))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Mark a submitted homework graded and write its reviews in one
    /// transaction. Fails with Conflict if the homework is no longer
    /// `submitted`, in which case nothing is written.
    pub async fn record_grading(&self, homework_id: Uuid, record: GradingRecord) -> Result<()> {
        let txn = self.db.begin().await?;

        let advanced = homework::Entity::update_many()
            .col_expr(homework::Column::Status, Expr::value(HomeworkStatus::Graded))
            .filter(homework::Column::Id.eq(homework_id))
            .filter(homework::Column::Status.eq(HomeworkStatus::Submitted))
            .exec(&txn)
            .await?;
        if advanced.rows_affected == 0 {
            txn.rollback().await?;
            return Err(Error::Conflict("homework was graded concurrently".to_string()));
        }

        homework_review::ActiveModel {
            id: Set(Uuid::new_v4()),
            homework_id: Set(homework_id),
            grade: Set(Some(record.grade)),
            overall_feedback: Set(Some(record.overall_feedback)),
            reviewed_at: Set(Utc::now()),
            reviewed_by: Set(Some(record.reviewed_by)),
        }
        .insert(&txn)
        .await?;

        for review in record.task_reviews {
            homework_task_review::ActiveModel {
                id: Set(Uuid::new_v4()),
                homework_task_id: Set(review.task_id),
                task_feedback: Set(Some(review.feedback)),
                score: Set(Some(review.score)),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Load tasks, task reviews and reviews for a homework
    pub async fn detail(&self, homework: homework::Model) -> Result<HomeworkDetail> {
        let tasks = self.tasks(homework.id).await?;

        let mut reviews_by_task: HashMap<Uuid, Vec<homework_task_review::Model>> = HashMap::new();
        if !tasks.is_empty() {
            let task_reviews = homework_task_review::Entity::find()
                .filter(
                    homework_task_review::Column::HomeworkTaskId
                        .is_in(tasks.iter().map(|t| t.id)),
                )
                .all(&self.db)
                .await?;
            for review in task_reviews {
                reviews_by_task
                    .entry(review.homework_task_id)
                    .or_default()
                    .push(review);
            }
        }

        let reviews = homework_review::Entity::find()
            .filter(homework_review::Column::HomeworkId.eq(homework.id))
            .order_by_asc(homework_review::Column::ReviewedAt)
            .all(&self.db)
            .await?;

        let tasks = tasks
            .into_iter()
            .map(|task| TaskDetail {
                reviews: reviews_by_task.remove(&task.id).unwrap_or_default(),
                task,
            })
            .collect();

        Ok(HomeworkDetail {
            homework,
            tasks,
            reviews,
        })
    }
}
