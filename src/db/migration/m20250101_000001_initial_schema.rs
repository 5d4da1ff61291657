//! Initial schema, derived from the entity definitions so column types
//! and foreign keys cannot drift from the models.

use crate::entity::{
    chat_message, homework, homework_review, homework_task, homework_task_review, lesson,
    material, mind_map, session, user,
};
use sea_orm::{EntityTrait, Schema};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        // Parents before children
        create_table_for(manager, &schema, user::Entity).await?;
        create_table_for(manager, &schema, session::Entity).await?;
        create_table_for(manager, &schema, chat_message::Entity).await?;
        create_table_for(manager, &schema, material::Entity).await?;
        create_table_for(manager, &schema, mind_map::Entity).await?;
        create_table_for(manager, &schema, homework::Entity).await?;
        create_table_for(manager, &schema, homework_task::Entity).await?;
        create_table_for(manager, &schema, homework_review::Entity).await?;
        create_table_for(manager, &schema, homework_task_review::Entity).await?;
        create_table_for(manager, &schema, lesson::Entity).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_user_id")
                    .table(session::Entity)
                    .col(session::Column::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_homework_tasks_homework_number")
                    .table(homework_task::Entity)
                    .col(homework_task::Column::HomeworkId)
                    .col(homework_task::Column::TaskNumber)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_chat_messages_session_id")
                    .table(chat_message::Entity)
                    .col(chat_message::Column::SessionId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children before parents
        drop_table_for(manager, lesson::Entity).await?;
        drop_table_for(manager, homework_task_review::Entity).await?;
        drop_table_for(manager, homework_review::Entity).await?;
        drop_table_for(manager, homework_task::Entity).await?;
        drop_table_for(manager, homework::Entity).await?;
        drop_table_for(manager, mind_map::Entity).await?;
        drop_table_for(manager, material::Entity).await?;
        drop_table_for(manager, chat_message::Entity).await?;
        drop_table_for(manager, session::Entity).await?;
        drop_table_for(manager, user::Entity).await
    }
}

async fn create_table_for<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .create_table(schema.create_table_from_entity(entity).if_not_exists().to_owned())
        .await
}

async fn drop_table_for<E: EntityTrait + 'static>(
    manager: &SchemaManager<'_>,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}
