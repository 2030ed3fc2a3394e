use async_graphql::{ComplexObject, Context, ErrorExtensions, ID, Object, Result};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::info;

use crate::entity::comment::{self, Entity as CommentEntity};
use crate::entity::task;
use crate::entity::user::{self, Entity as UserEntity};
use crate::graphql::parse_id;
use crate::graphql::task::find_task;
use crate::graphql::user::find_user;
use crate::model::comment::{CommentPayload, CreateCommentInput, UpdateCommentInput};
use crate::model::global_error::{AppError, ErrorCode, ValidationFieldError};

#[ComplexObject]
impl comment::Model {
    /// 댓글이 달린 태스크
    async fn task(&self, ctx: &Context<'_>) -> Result<Option<task::Model>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let task = task::Entity::find_by_id(self.task_id)
            .one(db)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(task)
    }

    /// 댓글 작성자
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<user::Model>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let user = UserEntity::find_by_id(self.user_id)
            .one(db)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(user)
    }
}

#[derive(Default)]
pub struct CommentQuery;

#[Object]
impl CommentQuery {
    /// 전체 댓글 목록 조회. 소프트 삭제된 댓글도 포함된다
    async fn all_comments(&self, ctx: &Context<'_>) -> Result<Vec<comment::Model>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let comments = CommentEntity::find()
            .all(db)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(comments)
    }

    /// 댓글 단건 조회
    async fn comment(&self, ctx: &Context<'_>, id: ID) -> Result<comment::Model> {
        let db = ctx.data::<DatabaseConnection>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;
        let comment = find_comment(db, id).await.map_err(|e| e.extend())?;
        Ok(comment)
    }
}

#[derive(Default)]
pub struct CommentMutation;

#[Object]
impl CommentMutation {
    /// 댓글 생성
    async fn create_comment(
        &self,
        ctx: &Context<'_>,
        input: CreateCommentInput,
    ) -> Result<CommentPayload> {
        let db = ctx.data::<DatabaseConnection>()?;
        Ok(match create_comment(db, input).await {
            Ok(comment) => CommentPayload::ok(comment, "댓글이 생성되었습니다"),
            Err(err) => CommentPayload::fail(err),
        })
    }

    /// 댓글 수정. isDeleted로 소프트 삭제/복구한다
    async fn update_comment(
        &self,
        ctx: &Context<'_>,
        input: UpdateCommentInput,
    ) -> Result<CommentPayload> {
        let db = ctx.data::<DatabaseConnection>()?;
        Ok(match update_comment(db, input).await {
            Ok(comment) => CommentPayload::ok(comment, "댓글이 수정되었습니다"),
            Err(err) => CommentPayload::fail(err),
        })
    }
}

pub async fn find_comment(db: &DatabaseConnection, id: i32) -> Result<comment::Model, AppError> {
    CommentEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CommentNotFound))
}

pub async fn create_comment(
    db: &DatabaseConnection,
    input: CreateCommentInput,
) -> Result<comment::Model, AppError> {
    if input.body.trim().is_empty() {
        return Err(AppError::ValidationError(vec![ValidationFieldError {
            field: "body".to_string(),
            message: "댓글 내용은 필수입니다.".to_string(),
        }]));
    }

    let task = find_task(db, parse_id(&input.task)?).await?;
    let user = find_user(db, parse_id(&input.user)?).await?;

    let now = Utc::now();
    let new_comment = comment::ActiveModel {
        task_id: Set(task.id),
        user_id: Set(user.id),
        body: Set(input.body),
        is_deleted: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    let comment = new_comment.insert(db).await?;
    info!("댓글 생성됨: id={}, 태스크={}", comment.id, comment.task_id);
    Ok(comment)
}

pub async fn update_comment(
    db: &DatabaseConnection,
    input: UpdateCommentInput,
) -> Result<comment::Model, AppError> {
    let id = parse_id(&input.id)?;
    let found = find_comment(db, id).await?;

    let comment = apply_comment_update(found, &input).update(db).await?;
    Ok(comment)
}

fn apply_comment_update(
    comment: comment::Model,
    input: &UpdateCommentInput,
) -> comment::ActiveModel {
    let mut model: comment::ActiveModel = comment.into();

    if let Some(body) = &input.body {
        model.body = Set(body.clone());
    }
    // None은 변경 없음, Some(false)는 삭제 취소
    if let Some(is_deleted) = input.is_deleted {
        model.is_deleted = Set(is_deleted);
    }
    model.updated_at = Set(Utc::now().into());

    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::task::TaskType;
    use crate::entity::user::UserRole;
    use sea_orm::{ActiveValue, DatabaseBackend, MockDatabase, MockExecResult};

    fn sample_user(id: i32) -> user::Model {
        let now = Utc::now();
        user::Model {
            id,
            first_name: "지훈".to_string(),
            last_name: "박".to_string(),
            user_name: format!("jihoon{id}"),
            email: format!("jihoon{id}@example.com"),
            password: "$2b$12$C8qQ3mLx1rN5yE9pT2uXhO".to_string(),
            mobile_number: format!("010123400{:02}", id),
            role: UserRole::Tester,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn sample_task(id: i32) -> task::Model {
        let now = Utc::now();
        task::Model {
            id,
            name: "로그인 개선".to_string(),
            description: "설명".to_string(),
            epic_id: 1,
            owner_id: 1,
            assignee_id: Some(1),
            task_type: TaskType::MainTask,
            parent_task_id: None,
            is_completed: false,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn sample_comment(id: i32, is_deleted: bool) -> comment::Model {
        let now = Utc::now();
        comment::Model {
            id,
            task_id: 1,
            user_id: 1,
            body: "리뷰 반영했습니다".to_string(),
            is_deleted,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_comment_fails_when_task_is_missing() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<task::Model>::new()])
            .into_connection();

        let input = CreateCommentInput {
            task: ID::from("9"),
            user: ID::from("1"),
            body: "리뷰 반영했습니다".to_string(),
        };
        let err = create_comment(&db, input).await.unwrap_err();
        assert!(matches!(err, AppError::ApiError(ErrorCode::TaskNotFound, _)));
    }

    #[tokio::test]
    async fn create_comment_fails_when_user_is_missing() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![sample_task(1)]])
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let input = CreateCommentInput {
            task: ID::from("1"),
            user: ID::from("9"),
            body: "리뷰 반영했습니다".to_string(),
        };
        let err = create_comment(&db, input).await.unwrap_err();
        assert!(matches!(err, AppError::ApiError(ErrorCode::UserNotFound, _)));
    }

    #[tokio::test]
    async fn create_comment_inserts_when_references_resolve() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![sample_task(1)]])
            .append_query_results([vec![sample_user(1)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 11,
                rows_affected: 1,
            }])
            .append_query_results([vec![sample_comment(11, false)]])
            .into_connection();

        let input = CreateCommentInput {
            task: ID::from("1"),
            user: ID::from("1"),
            body: "리뷰 반영했습니다".to_string(),
        };
        let comment = create_comment(&db, input).await.unwrap();
        assert_eq!(comment.id, 11);
        assert!(!comment.is_deleted);
    }

    #[tokio::test]
    async fn soft_delete_updates_the_row_in_place() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![sample_comment(11, false)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![sample_comment(11, true)]])
            .into_connection();

        let input = UpdateCommentInput {
            id: ID::from("11"),
            body: None,
            is_deleted: Some(true),
        };
        let comment = update_comment(&db, input).await.unwrap();
        assert_eq!(comment.id, 11);
        assert!(comment.is_deleted);
    }

    #[test]
    fn update_keeps_unsupplied_fields() {
        let input = UpdateCommentInput {
            id: ID::from("11"),
            body: None,
            is_deleted: Some(true),
        };

        let model = apply_comment_update(sample_comment(11, false), &input);
        assert!(matches!(model.body, ActiveValue::Unchanged(_)));
        assert!(matches!(model.is_deleted, ActiveValue::Set(true)));
    }

    #[test]
    fn update_accepts_explicit_false_to_restore() {
        let input = UpdateCommentInput {
            id: ID::from("11"),
            body: None,
            is_deleted: Some(false),
        };

        let model = apply_comment_update(sample_comment(11, true), &input);
        assert!(matches!(model.is_deleted, ActiveValue::Set(false)));
    }
}
