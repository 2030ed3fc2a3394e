use async_graphql::{ID, InputObject, SimpleObject};
use serde::{Deserialize, Serialize};

use crate::entity::user::{Model as UserModel, UserRole};
use crate::model::global_error::AppError;

#[derive(Debug, Serialize, Deserialize, InputObject)]
pub struct CreateUserInput {
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
    #[graphql(secret)]
    pub password: String,
    pub mobile_number: String,
    pub role: UserRole,
}

/// id 외의 필드는 전달된 것만 반영된다
#[derive(Debug, Serialize, Deserialize, InputObject)]
pub struct UpdateUserInput {
    pub id: ID,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Debug, SimpleObject)]
pub struct UserPayload {
    pub user: Option<UserModel>,
    pub success: bool,
    pub message: String,
}

impl UserPayload {
    pub fn ok(user: UserModel, message: &str) -> Self {
        Self {
            user: Some(user),
            success: true,
            message: message.to_string(),
        }
    }

    pub fn fail(err: AppError) -> Self {
        Self {
            user: None,
            success: false,
            message: err.to_string(),
        }
    }
}
