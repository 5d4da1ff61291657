//! Material uploads into the session's retrieval store

use super::store::{MaterialStore, NewMaterial};
use crate::entity::{material, FileType};
use crate::error::{Error, Result};
use crate::llm::{session_store, upload_document, RetrievalStore};
use crate::sessions::SessionStore;
use std::sync::Arc;
use uuid::Uuid;

pub struct MaterialService {
    sessions: SessionStore,
    materials: MaterialStore,
    retrieval: Arc<dyn RetrievalStore>,
}

impl MaterialService {
    pub fn new(
        sessions: SessionStore,
        materials: MaterialStore,
        retrieval: Arc<dyn RetrievalStore>,
    ) -> Self {
        Self {
            sessions,
            materials,
            retrieval,
        }
    }

    /// Index a file in the session store and record it
    pub async fn upload(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<material::Model> {
        self.sessions.require_owned(session_id, user_id).await?;
        if filename.trim().is_empty() {
            return Err(Error::Validation("uploaded file has no name".to_string()));
        }

        let file_type = FileType::from_filename(filename);
        let size = i64::try_from(bytes.len())
            .map_err(|_| Error::Validation("uploaded file is too large".to_string()))?;

        let store_id = session_store(self.retrieval.as_ref(), session_id).await?;
        let file_ref = upload_document(self.retrieval.as_ref(), filename, bytes, &store_id).await?;

        let material = self
            .materials
            .create(NewMaterial {
                session_id,
                name: filename.to_string(),
                file_url: file_ref,
                file_type,
                size,
            })
            .await?;
        tracing::info!(
            session_id = %session_id,
            material_id = %material.id,
            file_type = ?file_type,
            "Uploaded material"
        );
        Ok(material)
    }

    pub async fn list(&self, session_id: Uuid, user_id: Uuid) -> Result<Vec<material::Model>> {
        self.sessions.require_owned(session_id, user_id).await?;
        self.materials.list_for_session(session_id).await
    }
}
