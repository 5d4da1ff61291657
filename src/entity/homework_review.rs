use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Overall homework grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum Grade {
    #[sea_orm(string_value = "A")]
    A,
    #[sea_orm(string_value = "B")]
    B,
    #[sea_orm(string_value = "C")]
    C,
    #[sea_orm(string_value = "D")]
    D,
    #[sea_orm(string_value = "F")]
    F,
    #[sea_orm(string_value = "PASS")]
    #[serde(rename = "PASS")]
    Pass,
    #[sea_orm(string_value = "FAIL")]
    #[serde(rename = "FAIL")]
    Fail,
}

impl Grade {
    /// Wire names, in declaration order
    pub const ALL: [&'static str; 7] = ["A", "B", "C", "D", "F", "PASS", "FAIL"];
}

/// Summary of one grading pass
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "homework_reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub homework_id: Uuid,
    pub grade: Option<Grade>,
    #[sea_orm(column_type = "Text", nullable)]
    pub overall_feedback: Option<String>,
    pub reviewed_at: DateTimeUtc,
    pub reviewed_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::homework::Entity",
        from = "Column::HomeworkId",
        to = "super::homework::Column::Id"
    )]
    Homework,
}

impl Related<super::homework::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Homework.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
