use async_graphql::ErrorExtensions;
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // 요청 값 오류
    ValidationError,

    // 중복 (unique 제약)
    DuplicateUserName,
    DuplicateEmail,
    DuplicateMobileNumber,
    DuplicateEpicName,
    DuplicateTaskName,

    // 참조 대상 없음
    UserNotFound,
    EpicNotFound,
    TaskNotFound,
    ParentTaskNotFound,
    CommentNotFound,

    // 삭제 차단
    UserHasTasks,
    UserHasEpics,

    // 서버 오류
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "유효성 검증에 실패했습니다",

            ErrorCode::DuplicateUserName => "이미 사용 중인 사용자명입니다",
            ErrorCode::DuplicateEmail => "이미 등록된 이메일입니다",
            ErrorCode::DuplicateMobileNumber => "이미 등록된 휴대폰 번호입니다",
            ErrorCode::DuplicateEpicName => "이미 존재하는 에픽 이름입니다",
            ErrorCode::DuplicateTaskName => "같은 에픽에 동일한 이름의 태스크가 이미 존재합니다",

            ErrorCode::UserNotFound => "사용자를 찾을 수 없습니다",
            ErrorCode::EpicNotFound => "에픽을 찾을 수 없습니다",
            ErrorCode::TaskNotFound => "태스크를 찾을 수 없습니다",
            ErrorCode::ParentTaskNotFound => "상위 태스크를 찾을 수 없습니다",
            ErrorCode::CommentNotFound => "댓글을 찾을 수 없습니다",

            ErrorCode::UserHasTasks => "담당 중인 태스크가 있어 사용자를 삭제할 수 없습니다",
            ErrorCode::UserHasEpics => "생성한 에픽이 있어 사용자를 삭제할 수 없습니다",

            ErrorCode::DatabaseError => "데이터베이스 오류가 발생했습니다",
            ErrorCode::InternalError => "내부 서버 오류가 발생했습니다",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{}", api_error_message(.0, .1))]
    ApiError(ErrorCode, Option<String>),

    #[error("{}", join_field_errors(.0))]
    ValidationError(Vec<ValidationFieldError>),

    #[error("{}", database_message(.0))]
    Database(#[from] DbErr),
}

impl AppError {
    pub fn new(code: ErrorCode) -> Self {
        AppError::ApiError(code, None)
    }

    pub fn with_detail(code: ErrorCode, detail: String) -> Self {
        AppError::ApiError(code, Some(detail))
    }

    fn code_str(&self) -> String {
        match self {
            AppError::ApiError(code, _) => format!("{:?}", code),
            AppError::ValidationError(_) => format!("{:?}", ErrorCode::ValidationError),
            AppError::Database(_) => format!("{:?}", ErrorCode::DatabaseError),
        }
    }
}

fn api_error_message(code: &ErrorCode, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!("{}: {}", code.message(), detail),
        None => code.message().to_string(),
    }
}

fn join_field_errors(errors: &[ValidationFieldError]) -> String {
    let fields = errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} ({})", ErrorCode::ValidationError.message(), fields)
}

// unique 인덱스에 막힌 경우는 사전 검사를 빠져나간 동시 요청뿐이다
fn database_message(err: &DbErr) -> String {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => "이미 존재하는 데이터입니다".to_string(),
        _ => format!("{}: {}", ErrorCode::DatabaseError.message(), err),
    }
}

// From<AppError>는 async-graphql의 Display 블랭킷 구현과 충돌한다
impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code_str();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, ErrorCode, ValidationFieldError};

    #[test]
    fn api_error_appends_detail_to_message() {
        let err = AppError::with_detail(ErrorCode::UserHasTasks, "로그인 개선, 배포 자동화".to_string());
        assert_eq!(
            err.to_string(),
            "담당 중인 태스크가 있어 사용자를 삭제할 수 없습니다: 로그인 개선, 배포 자동화"
        );
    }

    #[test]
    fn api_error_without_detail_uses_code_message() {
        let err = AppError::new(ErrorCode::EpicNotFound);
        assert_eq!(err.to_string(), ErrorCode::EpicNotFound.message());
    }

    #[test]
    fn validation_error_joins_field_messages() {
        let err = AppError::ValidationError(vec![
            ValidationFieldError {
                field: "email".to_string(),
                message: "유효한 이메일 형식이 아닙니다.".to_string(),
            },
            ValidationFieldError {
                field: "password".to_string(),
                message: "비밀번호는 최소 8자 이상이어야 합니다.".to_string(),
            },
        ]);
        let rendered = err.to_string();
        assert!(rendered.contains("email"));
        assert!(rendered.contains("password"));
    }
}
