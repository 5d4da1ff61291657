use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Homework lifecycle. Advances `pending → submitted → graded` and never
/// moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum HomeworkStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "graded")]
    Graded,
}

impl HomeworkStatus {
    pub fn can_submit(self) -> bool {
        matches!(self, Self::Pending | Self::Submitted)
    }

    pub fn can_grade(self) -> bool {
        self == Self::Submitted
    }
}

impl std::fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Submitted => write!(f, "submitted"),
            Self::Graded => write!(f, "graded"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "homework")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub session_id: Uuid,
    pub title: String,
    pub status: HomeworkStatus,
    pub generated_at: DateTimeUtc,
    pub submitted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::SessionId",
        to = "super::session::Column::Id"
    )]
    Session,
    #[sea_orm(has_many = "super::homework_task::Entity")]
    Tasks,
    #[sea_orm(has_many = "super::homework_review::Entity")]
    Reviews,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::homework_task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl Related<super::homework_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert!(HomeworkStatus::Pending.can_submit());
        assert!(HomeworkStatus::Submitted.can_submit());
        assert!(!HomeworkStatus::Graded.can_submit());

        assert!(!HomeworkStatus::Pending.can_grade());
        assert!(HomeworkStatus::Submitted.can_grade());
        assert!(!HomeworkStatus::Graded.can_grade());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HomeworkStatus::Submitted).unwrap(),
            "\"submitted\""
        );
        assert_eq!(HomeworkStatus::Graded.to_string(), "graded");
    }
}
