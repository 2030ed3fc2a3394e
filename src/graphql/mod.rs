pub mod comment;
pub mod epic;
pub mod schema;
pub mod task;
pub mod user;

pub use schema::{BoardSchema, build_schema};

use async_graphql::ID;

use crate::model::global_error::{AppError, ErrorCode};

// GraphQL ID는 문자열로 전달되는 숫자 id다
pub(crate) fn parse_id(id: &ID) -> Result<i32, AppError> {
    id.parse::<i32>().map_err(|_| {
        AppError::with_detail(ErrorCode::ValidationError, format!("잘못된 ID 형식입니다: {}", id.as_str()))
    })
}
