use async_graphql::{Enum, SimpleObject};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, SimpleObject)]
#[sea_orm(table_name = "tasks")]
#[graphql(name = "Task", complex)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub epic_id: i32,
    pub owner_id: i32,
    pub assignee_id: Option<i32>,
    pub task_type: TaskType,
    pub parent_task_id: Option<i32>,
    pub is_completed: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, Copy, Enum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_type")]
pub enum TaskType {
    #[sea_orm(string_value = "main_task")]
    MainTask,

    #[sea_orm(string_value = "sub_task")]
    SubTask,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::epic::Entity",
        from = "Column::EpicId",
        to = "super::epic::Column::Id"
    )]
    Epic,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AssigneeId",
        to = "super::user::Column::Id"
    )]
    Assignee,

    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentTaskId",
        to = "Column::Id"
    )]
    ParentTask,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::epic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Epic.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::TaskType;
    use sea_orm::ActiveEnum;

    #[test]
    fn task_type_values_match_stored_strings() {
        assert_eq!(TaskType::MainTask.to_value(), "main_task");
        assert_eq!(TaskType::SubTask.to_value(), "sub_task");
        assert!(TaskType::try_from_value(&"epic".to_string()).is_err());
    }
}
