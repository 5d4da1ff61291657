//! Mind map generation from session materials

use super::store::MindMapStore;
use crate::entity::mind_map;
use crate::error::{Error, Result};
use crate::llm::image::clip_prompt;
use crate::llm::{session_store, AssistantRunner, AssistantSpec, ImageGenerator, RetrievalStore};
use crate::sessions::SessionStore;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub const ARCHITECT_NAME: &str = "Mind Map Architect";
pub const ARCHITECT_INSTRUCTIONS: &str = "You are an expert in creating educational mind maps. \
Always use the file_search tool to read uploaded materials.";

/// Used when the summarizing run produces nothing
pub const FALLBACK_DESCRIPTION: &str = "A mind map.";

const DESCRIPTION_PROMPT: &str = r#"IMPORTANT: Use the file_search tool to access and read ALL uploaded materials in the vector store.

Your task:
1. Search and read through all of the uploaded documents.
2. Identify the main topic, the key concepts and how they relate.
3. Write a visual description of a mind map that summarizes these concepts.

The description will be given to an image generation model. Include:
- The central topic
- 3-5 main branches (major concepts)
- Sub-topics for each branch
- Key keywords and relationships

Format: start with "A professional educational mind map about [TOPIC]. The center shows [CENTRAL CONCEPT]. Main branches include: [BRANCH 1] with sub-topics [X, Y, Z], [BRANCH 2] with [A, B, C]..." and so on.

Keep the description under 1000 characters but detailed enough for a clear, informative mind map.
Do not ask the user for information. Read the files in the vector store."#;

pub struct MindMapService {
    sessions: SessionStore,
    mind_maps: MindMapStore,
    retrieval: Arc<dyn RetrievalStore>,
    images: Arc<dyn ImageGenerator>,
    runner: AssistantRunner,
    model: String,
}

impl MindMapService {
    pub fn new(
        sessions: SessionStore,
        mind_maps: MindMapStore,
        retrieval: Arc<dyn RetrievalStore>,
        images: Arc<dyn ImageGenerator>,
        runner: AssistantRunner,
        model: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            mind_maps,
            retrieval,
            images,
            runner,
            model: model.into(),
        }
    }

    /// Summarize the session's materials and render the summary as an image
    pub async fn generate(&self, session_id: Uuid, user_id: Uuid) -> Result<mind_map::Model> {
        self.sessions.require_owned(session_id, user_id).await?;
        let store_id = session_store(self.retrieval.as_ref(), session_id).await?;

        let description = self.describe(session_id, store_id).await;
        let image_url = self
            .images
            .generate(clip_prompt(&description))
            .await
            .map_err(|e| {
                tracing::warn!(session_id = %session_id, error = %e, "Mind map image generation failed");
                Error::ExternalService(format!("failed to generate mind map image: {}", e))
            })?;

        let title = format!("Mind Map - {}", Utc::now().format("%Y-%m-%d"));
        let mind_map = self
            .mind_maps
            .create(session_id, &title, &image_url, &description)
            .await?;
        tracing::info!(session_id = %session_id, mind_map_id = %mind_map.id, "Generated mind map");
        Ok(mind_map)
    }

    async fn describe(&self, session_id: Uuid, store_id: String) -> String {
        let spec = AssistantSpec::new(ARCHITECT_NAME, ARCHITECT_INSTRUCTIONS, &self.model)
            .with_vector_store(store_id);
        match self.runner.run_transient(&spec, DESCRIPTION_PROMPT, None).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => FALLBACK_DESCRIPTION.to_string(),
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Mind map summary failed, using fallback");
                FALLBACK_DESCRIPTION.to_string()
            }
        }
    }

    pub async fn list(&self, session_id: Uuid, user_id: Uuid) -> Result<Vec<mind_map::Model>> {
        self.sessions.require_owned(session_id, user_id).await?;
        self.mind_maps.list_for_session(session_id).await
    }
}
