use async_graphql::{ID, InputObject, SimpleObject};
use serde::{Deserialize, Serialize};

use crate::entity::epic::Model as EpicModel;
use crate::model::global_error::AppError;

#[derive(Debug, Serialize, Deserialize, InputObject)]
pub struct CreateEpicInput {
    pub name: String,
    /// 에픽을 소유할 사용자 ID
    pub user: ID,
    pub is_completed: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, InputObject)]
pub struct UpdateEpicInput {
    pub id: ID,
    pub name: Option<String>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, SimpleObject)]
pub struct EpicPayload {
    pub epic: Option<EpicModel>,
    pub success: bool,
    pub message: String,
}

impl EpicPayload {
    pub fn ok(epic: EpicModel, message: &str) -> Self {
        Self {
            epic: Some(epic),
            success: true,
            message: message.to_string(),
        }
    }

    pub fn fail(err: AppError) -> Self {
        Self {
            epic: None,
            success: false,
            message: err.to_string(),
        }
    }
}
