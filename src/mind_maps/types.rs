//! Wire types for the mind map API

use crate::entity::mind_map;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapRead {
    pub id: Uuid,
    pub session_id: Uuid,
    pub title: String,
    pub node_count: i32,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<mind_map::Model> for MindMapRead {
    fn from(model: mind_map::Model) -> Self {
        Self {
            id: model.id,
            session_id: model.session_id,
            title: model.title,
            node_count: model.node_count,
            data: model.data,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
