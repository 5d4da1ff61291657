use sea_orm::entity::prelude::*;

/// Per-task result of one grading pass
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "homework_task_reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub homework_task_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub task_feedback: Option<String>,
    /// Rounded to two decimal places before insert
    #[sea_orm(column_type = "Double", nullable)]
    pub score: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::homework_task::Entity",
        from = "Column::HomeworkTaskId",
        to = "super::homework_task::Column::Id"
    )]
    Task,
}

impl Related<super::homework_task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
