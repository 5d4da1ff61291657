//! Mind map persistence

use crate::entity::mind_map;
use crate::error::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct MindMapStore {
    db: DatabaseConnection,
}

impl MindMapStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record an image mind map. Image maps carry no nodes.
    pub async fn create(
        &self,
        session_id: Uuid,
        title: &str,
        image_url: &str,
        prompt: &str,
    ) -> Result<mind_map::Model> {
        let now = Utc::now();
        let model = mind_map::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(session_id),
            title: Set(title.to_string()),
            node_count: Set(0),
            data: Set(serde_json::json!({
                "image_url": image_url,
                "prompt": prompt,
            })),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(model)
    }

    /// Mind maps of a session, newest first
    pub async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<mind_map::Model>> {
        Ok(mind_map::Entity::find()
            .filter(mind_map::Column::SessionId.eq(session_id))
            .order_by_desc(mind_map::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{memory_db, seed_user};
    use crate::sessions::SessionStore;

    #[tokio::test]
    async fn test_create_stores_image_payload() {
        let db = memory_db().await;
        let user = seed_user(&db, "owner@example.com").await;
        let sessions = SessionStore::new(db.clone());
        let session = sessions.create(user, "History").await.unwrap();
        let other = sessions.create(user, "Art").await.unwrap();
        let store = MindMapStore::new(db);

        let map = store
            .create(session.id, "Mind Map - 2025-01-01", "https://img/1.png", "A map")
            .await
            .unwrap();
        assert_eq!(map.node_count, 0);
        assert_eq!(map.data["image_url"], "https://img/1.png");
        assert_eq!(map.data["prompt"], "A map");

        store
            .create(other.id, "Mind Map - 2025-01-01", "https://img/2.png", "B")
            .await
            .unwrap();
        let listed = store.list_for_session(session.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, map.id);
    }
}
