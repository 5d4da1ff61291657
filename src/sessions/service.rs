//! Learning sessions and tutor chat

use super::store::{ChatMessageStore, SessionStore};
use crate::entity::{chat_message, session, MessageRole};
use crate::error::{Error, Result};
use crate::llm::{session_store, ConversationalAgent, RetrievalStore};
use std::sync::Arc;
use uuid::Uuid;

pub struct ChatService {
    sessions: SessionStore,
    messages: ChatMessageStore,
    agent: Arc<ConversationalAgent>,
    retrieval: Arc<dyn RetrievalStore>,
}

impl ChatService {
    pub fn new(
        sessions: SessionStore,
        messages: ChatMessageStore,
        agent: Arc<ConversationalAgent>,
        retrieval: Arc<dyn RetrievalStore>,
    ) -> Self {
        Self {
            sessions,
            messages,
            agent,
            retrieval,
        }
    }

    /// Create a session for a known user
    pub async fn create_session(&self, user_id: Uuid, title: &str) -> Result<session::Model> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("session title must not be empty".to_string()));
        }
        if !self.sessions.user_exists(user_id).await? {
            return Err(Error::Unauthorized("unknown user".to_string()));
        }
        let session = self.sessions.create(user_id, title).await?;
        tracing::info!(session_id = %session.id, user_id = %user_id, "Created session");
        Ok(session)
    }

    pub async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<session::Model>> {
        self.sessions.list_for_user(user_id).await
    }

    /// Persist the user's message, ask the tutor and persist its reply.
    ///
    /// When the tutor fails the user message stays recorded.
    pub async fn send_message(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<chat_message::Model> {
        if content.trim().is_empty() {
            return Err(Error::Validation("message must not be empty".to_string()));
        }
        self.sessions.require_owned(session_id, user_id).await?;

        let history = self.messages.list_for_session(session_id).await?;
        self.messages
            .append(session_id, MessageRole::User, content)
            .await?;

        let store_id = session_store(self.retrieval.as_ref(), session_id).await?;
        let reply = self
            .agent
            .send(session_id, &history, content, Some(&store_id))
            .await
            .map_err(|e| match e {
                Error::ExternalService(_) | Error::Http(_) => e,
                other => Error::ExternalService(other.to_string()),
            })?;

        self.messages
            .append(session_id, MessageRole::Assistant, &reply)
            .await
    }

    pub async fn list_messages(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<chat_message::Model>> {
        self.sessions.require_owned(session_id, user_id).await?;
        self.messages.list_for_session(session_id).await
    }

    /// Delete the chat history of every session the user owns
    pub async fn clear_history(&self, user_id: Uuid) -> Result<u64> {
        let ids: Vec<Uuid> = self
            .sessions
            .list_for_user(user_id)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();

        let deleted = self.messages.clear_sessions(&ids).await?;
        for id in &ids {
            self.agent.forget(*id).await;
        }
        tracing::info!(user_id = %user_id, sessions = ids.len(), deleted, "Cleared chat history");
        Ok(deleted)
    }
}
