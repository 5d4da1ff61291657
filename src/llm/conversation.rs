//! Tutor conversations over hosted threads
//!
//! Each session maps to one hosted thread. Thread ids live in a bounded
//! cache; on a miss the thread is rebuilt from the persisted chat history,
//! so eviction never loses conversation state. Threads that leave the cache
//! are deleted on the hosted side.

use super::assistant::AssistantRunner;
use super::types::{AssistantSpec, ThreadMessage};
use crate::cache::BoundedCache;
use crate::config::ConversationConfig;
use crate::entity::chat_message;
use crate::error::Result;
use tokio::sync::OnceCell;
use uuid::Uuid;

const TUTOR_NAME: &str = "Learning Assistant";

const TUTOR_INSTRUCTIONS: &str = "You are a helpful learning assistant. \
You help students with their homework, lessons, and understanding course materials. \
Search the uploaded materials to ground your answers, explain the reasoning behind \
each answer and close with a short takeaway.";

/// Chat front-end to the hosted tutor assistant
pub struct ConversationalAgent {
    runner: AssistantRunner,
    spec: AssistantSpec,
    assistant_id: OnceCell<String>,
    threads: BoundedCache<Uuid, String>,
}

impl ConversationalAgent {
    pub fn new(runner: AssistantRunner, model: &str, config: &ConversationConfig) -> Self {
        let assistant_id = match &config.assistant_id {
            Some(id) => OnceCell::new_with(Some(id.clone())),
            None => OnceCell::new(),
        };
        Self {
            runner,
            spec: AssistantSpec::new(TUTOR_NAME, TUTOR_INSTRUCTIONS, model),
            assistant_id,
            threads: BoundedCache::new(config.cache_capacity, config.cache_ttl()),
        }
    }

    /// Send `message` in the session's conversation and return the reply.
    ///
    /// `history` holds the turns persisted before `message` and is only
    /// read when the session has no live thread.
    pub async fn send(
        &self,
        session_id: Uuid,
        history: &[chat_message::Model],
        message: &str,
        store_id: Option<&str>,
    ) -> Result<String> {
        let assistant_id = self.tutor_id().await?;
        let thread_id = self.thread_for(session_id, history, store_id).await?;

        let reply = async {
            self.runner.api().add_message(&thread_id, message).await?;
            self.runner
                .run_on_thread(&thread_id, assistant_id, None)
                .await
        }
        .await;

        if let Err(e) = &reply {
            tracing::warn!(session_id = %session_id, thread_id = %thread_id, error = %e, "Tutor run failed");
            // The next send rebuilds the thread from history
            self.threads.remove(&session_id).await;
            self.runner.discard_thread(&thread_id).await;
        }
        reply
    }

    async fn tutor_id(&self) -> Result<&String> {
        self.assistant_id
            .get_or_try_init(|| async {
                let id = self.runner.api().create_assistant(&self.spec).await?;
                tracing::info!(assistant_id = %id, "Created tutor assistant");
                Ok(id)
            })
            .await
    }

    async fn thread_for(
        &self,
        session_id: Uuid,
        history: &[chat_message::Model],
        store_id: Option<&str>,
    ) -> Result<String> {
        if let Some(thread_id) = self.threads.get(&session_id).await {
            return Ok(thread_id);
        }

        let seed: Vec<ThreadMessage> = history
            .iter()
            .filter_map(|m| ThreadMessage::from_history(m.role, &m.content))
            .collect();
        let thread_id = self.runner.api().create_thread(&seed, store_id).await?;
        tracing::debug!(
            session_id = %session_id,
            thread_id = %thread_id,
            seeded = seed.len(),
            "Opened conversation thread"
        );

        for (evicted, stale_thread) in self.threads.put(session_id, thread_id.clone()).await {
            tracing::debug!(session_id = %evicted, thread_id = %stale_thread, "Evicted conversation thread from cache");
            self.runner.discard_thread(&stale_thread).await;
        }
        Ok(thread_id)
    }

    /// Forget the cached thread of a session and delete it
    pub async fn forget(&self, session_id: Uuid) {
        if let Some(thread_id) = self.threads.remove(&session_id).await {
            self.runner.discard_thread(&thread_id).await;
        }
    }
}
