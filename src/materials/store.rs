//! Material persistence

use crate::entity::{material, FileType};
use crate::error::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// Fields of a material about to be recorded
#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub session_id: Uuid,
    pub name: String,
    pub file_url: String,
    pub file_type: FileType,
    pub size: i64,
}

#[derive(Clone)]
pub struct MaterialStore {
    db: DatabaseConnection,
}

impl MaterialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewMaterial) -> Result<material::Model> {
        let model = material::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(new.session_id),
            name: Set(new.name),
            file_url: Set(new.file_url),
            file_type: Set(new.file_type),
            size: Set(new.size),
            uploaded_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(model)
    }

    /// Materials of a session in upload order
    pub async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<material::Model>> {
        Ok(material::Entity::find()
            .filter(material::Column::SessionId.eq(session_id))
            .order_by_asc(material::Column::UploadedAt)
            .all(&self.db)
            .await?)
    }

    /// Display names of the listed materials that belong to `session_id`.
    ///
    /// Ids from other sessions, or unknown ids, are skipped.
    pub async fn names_in_session(&self, session_id: Uuid, ids: &[Uuid]) -> Result<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = material::Entity::find()
            .filter(material::Column::SessionId.eq(session_id))
            .filter(material::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(material::Column::UploadedAt)
            .all(&self.db)
            .await?;
        Ok(found.into_iter().map(|m| m.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{memory_db, seed_user};
    use crate::sessions::SessionStore;

    fn new_material(session_id: Uuid, name: &str) -> NewMaterial {
        NewMaterial {
            session_id,
            name: name.to_string(),
            file_url: format!("file-{}", name),
            file_type: FileType::from_filename(name),
            size: 42,
        }
    }

    #[tokio::test]
    async fn test_names_in_session_ignores_other_sessions() {
        let db = memory_db().await;
        let user = seed_user(&db, "owner@example.com").await;
        let sessions = SessionStore::new(db.clone());
        let store = MaterialStore::new(db);

        let mine = sessions.create(user, "Mine").await.unwrap();
        let other = sessions.create(user, "Other").await.unwrap();
        let a = store.create(new_material(mine.id, "a.pdf")).await.unwrap();
        let b = store.create(new_material(other.id, "b.pdf")).await.unwrap();

        let names = store
            .names_in_session(mine.id, &[a.id, b.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(names, ["a.pdf"]);
        assert!(store.names_in_session(mine.id, &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_for_session() {
        let db = memory_db().await;
        let user = seed_user(&db, "owner@example.com").await;
        let session = SessionStore::new(db.clone()).create(user, "S").await.unwrap();
        let store = MaterialStore::new(db);

        store.create(new_material(session.id, "notes.txt")).await.unwrap();
        let listed = store.list_for_session(session.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].file_type, FileType::Txt);
        assert_eq!(listed[0].size, 42);
    }
}
