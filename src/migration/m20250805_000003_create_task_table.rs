use sea_orm_migration::prelude::*;
use crate::entity::task::{Column, Entity};
use crate::entity::{epic, user};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {

    // tasks는 users를 두 번(owner, assignee) 참조하므로 FK 이름을 직접 지정한다
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Column::Name).string().not_null())
                    .col(ColumnDef::new(Column::Description).text().not_null())
                    .col(ColumnDef::new(Column::EpicId).integer().not_null())
                    .col(ColumnDef::new(Column::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Column::AssigneeId).integer())
                    .col(
                        ColumnDef::new(Column::TaskType)
                            .enumeration(
                                Alias::new("task_type"),
                                [Alias::new("main_task"), Alias::new("sub_task")],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(Column::ParentTaskId).integer())
                    .col(ColumnDef::new(Column::IsCompleted).boolean().not_null())
                    .col(
                        ColumnDef::new(Column::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Column::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tasks-epic_id")
                            .from(Entity, Column::EpicId)
                            .to(epic::Entity, epic::Column::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tasks-owner_id")
                            .from(Entity, Column::OwnerId)
                            .to(user::Entity, user::Column::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tasks-assignee_id")
                            .from(Entity, Column::AssigneeId)
                            .to(user::Entity, user::Column::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tasks-parent_task_id")
                            .from(Entity, Column::ParentTaskId)
                            .to(Entity, Column::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_task_name_epic")
                    .table(Entity)
                    .col(Column::Name)
                    .col(Column::EpicId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entity).to_owned())
            .await
    }
}
