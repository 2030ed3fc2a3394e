use async_graphql::{ID, InputObject, SimpleObject};
use serde::{Deserialize, Serialize};

use crate::entity::task::{Model as TaskModel, TaskType};
use crate::model::global_error::AppError;

#[derive(Debug, Serialize, Deserialize, InputObject)]
pub struct CreateTaskInput {
    pub name: String,
    pub description: String,
    pub epic: ID,
    pub owner: ID,
    pub assignee: ID,
    /// 지정하지 않으면 MAIN_TASK
    pub task_type: Option<TaskType>,
    pub parent_task: Option<ID>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, InputObject)]
pub struct UpdateTaskInput {
    pub id: ID,
    pub name: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<ID>,
    pub parent_task: Option<ID>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, SimpleObject)]
pub struct TaskPayload {
    pub task: Option<TaskModel>,
    pub success: bool,
    pub message: String,
}

impl TaskPayload {
    pub fn ok(task: TaskModel, message: &str) -> Self {
        Self {
            task: Some(task),
            success: true,
            message: message.to_string(),
        }
    }

    pub fn fail(err: AppError) -> Self {
        Self {
            task: None,
            success: false,
            message: err.to_string(),
        }
    }
}
