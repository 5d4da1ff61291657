//! Lesson persistence

use crate::entity::lesson;
use crate::error::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

#[derive(Clone)]
pub struct LessonStore {
    db: DatabaseConnection,
}

impl LessonStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lessons of a session in creation order
    pub async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<lesson::Model>> {
        Ok(lesson::Entity::find()
            .filter(lesson::Column::SessionId.eq(session_id))
            .order_by_asc(lesson::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::entity::{lesson, LessonStatus};
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
    use uuid::Uuid;

    /// Insert a lesson row directly
    pub async fn seed_lesson(
        db: &DatabaseConnection,
        session_id: Uuid,
        title: &str,
        status: LessonStatus,
    ) -> lesson::Model {
        lesson::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(session_id),
            title: Set(title.to_string()),
            progress: Set(0),
            current_step: Set(0),
            total_steps: Set(5),
            status: Set(status),
            created_at: Set(Utc::now()),
            completed_at: Set(None),
        }
        .insert(db)
        .await
        .unwrap()
    }
}
