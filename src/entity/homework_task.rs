use sea_orm::entity::prelude::*;

/// One numbered task within a homework batch
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "homework_tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub homework_id: Uuid,
    /// 1-based, dense within the homework
    pub task_number: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Display name of the uploaded solution
    #[sea_orm(column_type = "Text", nullable)]
    pub uploaded_file_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::homework::Entity",
        from = "Column::HomeworkId",
        to = "super::homework::Column::Id"
    )]
    Homework,
    #[sea_orm(has_many = "super::homework_task_review::Entity")]
    Reviews,
}

impl Related<super::homework::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Homework.def()
    }
}

impl Related<super::homework_task_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
