//! Wire types for the materials API

use crate::entity::{material, FileType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRead {
    pub id: Uuid,
    pub session_id: Uuid,
    pub name: String,
    pub file_url: String,
    pub file_type: FileType,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl From<material::Model> for MaterialRead {
    fn from(model: material::Model) -> Self {
        Self {
            id: model.id,
            session_id: model.session_id,
            name: model.name,
            file_url: model.file_url,
            file_type: model.file_type,
            size: model.size,
            uploaded_at: model.uploaded_at,
        }
    }
}
