use async_graphql::{ID, InputObject, SimpleObject};
use serde::{Deserialize, Serialize};

use crate::entity::comment::Model as CommentModel;
use crate::model::global_error::AppError;

#[derive(Debug, Serialize, Deserialize, InputObject)]
pub struct CreateCommentInput {
    pub task: ID,
    pub user: ID,
    pub body: String,
}

/// isDeleted는 소프트 삭제 플래그다. 행은 지워지지 않는다
#[derive(Debug, Serialize, Deserialize, InputObject)]
pub struct UpdateCommentInput {
    pub id: ID,
    pub body: Option<String>,
    pub is_deleted: Option<bool>,
}

#[derive(Debug, SimpleObject)]
pub struct CommentPayload {
    pub comment: Option<CommentModel>,
    pub success: bool,
    pub message: String,
}

impl CommentPayload {
    pub fn ok(comment: CommentModel, message: &str) -> Self {
        Self {
            comment: Some(comment),
            success: true,
            message: message.to_string(),
        }
    }

    pub fn fail(err: AppError) -> Self {
        Self {
            comment: None,
            success: false,
            message: err.to_string(),
        }
    }
}
