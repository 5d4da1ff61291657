use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Coarse classification of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    #[sea_orm(string_value = "pdf")]
    Pdf,
    #[sea_orm(string_value = "docx")]
    Docx,
    #[sea_orm(string_value = "txt")]
    Txt,
    #[sea_orm(string_value = "image")]
    Image,
    #[sea_orm(string_value = "other")]
    Other,
}

impl FileType {
    /// Classify by file extension, case-insensitively
    pub fn from_filename(filename: &str) -> Self {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "txt" => Self::Txt,
            "png" | "jpg" | "jpeg" => Self::Image,
            _ => Self::Other,
        }
    }
}

/// An uploaded learning material. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "materials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub session_id: Uuid,
    pub name: String,
    /// Hosted file identifier returned by the retrieval store
    #[sea_orm(column_type = "Text")]
    pub file_url: String,
    pub file_type: FileType,
    pub size: i64,
    pub uploaded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::SessionId",
        to = "super::session::Column::Id"
    )]
    Session,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
