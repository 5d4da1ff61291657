//! Session and chat message persistence

use crate::entity::{chat_message, session, user, MessageRole};
use crate::error::{Error, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

/// Sessions and their ownership checks
#[derive(Clone)]
pub struct SessionStore {
    db: DatabaseConnection,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: Uuid, title: &str) -> Result<session::Model> {
        let now = Utc::now();
        let model = session::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            title: Set(title.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(model)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<session::Model>> {
        Ok(session::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Load a session owned by `user_id`.
    ///
    /// A session that exists under another user is reported as not found.
    pub async fn require_owned(&self, id: Uuid, user_id: Uuid) -> Result<session::Model> {
        match self.get(id).await? {
            Some(session) if session.user_id == user_id => Ok(session),
            _ => Err(Error::not_found("Session")),
        }
    }

    /// Sessions of a user, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<session::Model>> {
        Ok(session::Entity::find()
            .filter(session::Column::UserId.eq(user_id))
            .order_by_desc(session::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn user_exists(&self, user_id: Uuid) -> Result<bool> {
        let count = user::Entity::find_by_id(user_id).count(&self.db).await?;
        Ok(count > 0)
    }
}

/// Append-only chat log per session
#[derive(Clone)]
pub struct ChatMessageStore {
    db: DatabaseConnection,
}

impl ChatMessageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn append(
        &self,
        session_id: Uuid,
        role: MessageRole,
        content: &str,
    ) -> Result<chat_message::Model> {
        let model = chat_message::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(session_id),
            role: Set(role),
            content: Set(content.to_string()),
            timestamp: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(model)
    }

    /// Messages of a session, oldest first
    pub async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<chat_message::Model>> {
        Ok(chat_message::Entity::find()
            .filter(chat_message::Column::SessionId.eq(session_id))
            .order_by_asc(chat_message::Column::Timestamp)
            .all(&self.db)
            .await?)
    }

    /// Delete every message in the given sessions, returning the count
    pub async fn clear_sessions(&self, session_ids: &[Uuid]) -> Result<u64> {
        if session_ids.is_empty() {
            return Ok(0);
        }
        let result = chat_message::Entity::delete_many()
            .filter(chat_message::Column::SessionId.is_in(session_ids.iter().copied()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{memory_db, seed_user};

    #[tokio::test]
    async fn test_require_owned_hides_foreign_sessions() {
        let db = memory_db().await;
        let owner = seed_user(&db, "owner@example.com").await;
        let other = seed_user(&db, "other@example.com").await;
        let store = SessionStore::new(db);

        let session = store.create(owner, "Biology").await.unwrap();
        assert_eq!(store.require_owned(session.id, owner).await.unwrap().title, "Biology");

        let err = store.require_owned(session.id, other).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        let err = store.require_owned(Uuid::new_v4(), owner).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        let db = memory_db().await;
        let owner = seed_user(&db, "owner@example.com").await;
        let store = SessionStore::new(db);

        store.create(owner, "First").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.create(owner, "Second").await.unwrap();

        let titles: Vec<_> = store
            .list_for_user(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, ["Second", "First"]);
        assert!(store.user_exists(owner).await.unwrap());
        assert!(!store.user_exists(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_messages_append_list_and_clear() {
        let db = memory_db().await;
        let owner = seed_user(&db, "owner@example.com").await;
        let sessions = SessionStore::new(db.clone());
        let messages = ChatMessageStore::new(db);

        let a = sessions.create(owner, "A").await.unwrap();
        let b = sessions.create(owner, "B").await.unwrap();
        messages.append(a.id, MessageRole::User, "hello").await.unwrap();
        messages.append(a.id, MessageRole::Assistant, "hi there").await.unwrap();
        messages.append(b.id, MessageRole::User, "other").await.unwrap();

        let log = messages.list_for_session(a.id).await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].role, MessageRole::User);
        assert_eq!(log[1].content, "hi there");

        assert_eq!(messages.clear_sessions(&[a.id]).await.unwrap(), 2);
        assert!(messages.list_for_session(a.id).await.unwrap().is_empty());
        assert_eq!(messages.list_for_session(b.id).await.unwrap().len(), 1);
        assert_eq!(messages.clear_sessions(&[]).await.unwrap(), 0);
    }
}
