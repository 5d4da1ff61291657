//! Session-scoped retrieval stores

use crate::error::Result;
use crate::extract;
use async_trait::async_trait;
use uuid::Uuid;

/// Hosted vector index of uploaded documents
#[async_trait]
pub trait RetrievalStore: Send + Sync {
    /// Create a store, returning its id
    async fn create(&self, name: &str) -> Result<String>;

    /// Find a store by exact name
    async fn find_by_name(&self, name: &str) -> Result<Option<String>>;

    /// Upload a file and attach it to the store, returning the file id
    async fn upload(&self, filename: &str, bytes: Vec<u8>, store_id: &str) -> Result<String>;

    async fn get_or_create(&self, name: &str) -> Result<String> {
        if let Some(id) = self.find_by_name(name).await? {
            return Ok(id);
        }
        let id = self.create(name).await?;
        tracing::info!(store = name, store_id = %id, "Created retrieval store");
        Ok(id)
    }
}

/// Store name for a session
pub fn session_store_name(session_id: Uuid) -> String {
    format!("session_{}", session_id)
}

/// Resolve or create the store of a session
pub async fn session_store(store: &dyn RetrievalStore, session_id: Uuid) -> Result<String> {
    store.get_or_create(&session_store_name(session_id)).await
}

/// Upload a document, converting PDF and DOCX to plain text first
pub async fn upload_document(
    store: &dyn RetrievalStore,
    filename: &str,
    bytes: Vec<u8>,
    store_id: &str,
) -> Result<String> {
    let prepared = extract::prepare_upload(filename, bytes).await;
    store
        .upload(&prepared.filename, prepared.bytes, store_id)
        .await
}
