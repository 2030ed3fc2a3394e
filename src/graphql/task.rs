use async_graphql::{ComplexObject, Context, ErrorExtensions, ID, Object, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Select, Set,
};
use tracing::info;

use crate::entity::epic::{self, Entity as EpicEntity};
use crate::entity::task::{self, Entity as TaskEntity, TaskType};
use crate::entity::user::{self, Entity as UserEntity};
use crate::graphql::epic::find_epic;
use crate::graphql::parse_id;
use crate::graphql::user::find_user;
use crate::model::global_error::{AppError, ErrorCode, ValidationFieldError};
use crate::model::task::{CreateTaskInput, TaskPayload, UpdateTaskInput};

#[ComplexObject]
impl task::Model {
    /// 태스크가 속한 에픽
    async fn epic(&self, ctx: &Context<'_>) -> Result<Option<epic::Model>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let epic = EpicEntity::find_by_id(self.epic_id)
            .one(db)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(epic)
    }

    /// 태스크 담당자
    async fn owner(&self, ctx: &Context<'_>) -> Result<Option<user::Model>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let owner = UserEntity::find_by_id(self.owner_id)
            .one(db)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(owner)
    }

    /// 태스크 할당자 (없을 수 있다)
    async fn assignee(&self, ctx: &Context<'_>) -> Result<Option<user::Model>> {
        let Some(assignee_id) = self.assignee_id else {
            return Ok(None);
        };
        let db = ctx.data::<DatabaseConnection>()?;
        let assignee = UserEntity::find_by_id(assignee_id)
            .one(db)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(assignee)
    }

    /// 상위 태스크 (서브 태스크인 경우)
    async fn parent_task(&self, ctx: &Context<'_>) -> Result<Option<task::Model>> {
        let Some(parent_task_id) = self.parent_task_id else {
            return Ok(None);
        };
        let db = ctx.data::<DatabaseConnection>()?;
        let parent = TaskEntity::find_by_id(parent_task_id)
            .one(db)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(parent)
    }
}

#[derive(Default)]
pub struct TaskQuery;

#[Object]
impl TaskQuery {
    /// 전체 태스크 목록 조회
    async fn all_tasks(&self, ctx: &Context<'_>) -> Result<Vec<task::Model>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let tasks = TaskEntity::find()
            .all(db)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(tasks)
    }

    /// 태스크 단건 조회
    async fn task(&self, ctx: &Context<'_>, id: ID) -> Result<task::Model> {
        let db = ctx.data::<DatabaseConnection>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;
        let task = find_task(db, id).await.map_err(|e| e.extend())?;
        Ok(task)
    }
}

#[derive(Default)]
pub struct TaskMutation;

#[Object]
impl TaskMutation {
    /// 태스크 생성
    async fn create_task(&self, ctx: &Context<'_>, input: CreateTaskInput) -> Result<TaskPayload> {
        let db = ctx.data::<DatabaseConnection>()?;
        Ok(match create_task(db, input).await {
            Ok(task) => TaskPayload::ok(task, "태스크가 생성되었습니다"),
            Err(err) => TaskPayload::fail(err),
        })
    }

    /// 태스크 수정 (전달된 필드만 반영)
    async fn update_task(&self, ctx: &Context<'_>, input: UpdateTaskInput) -> Result<TaskPayload> {
        let db = ctx.data::<DatabaseConnection>()?;
        Ok(match update_task(db, input).await {
            Ok(task) => TaskPayload::ok(task, "태스크가 수정되었습니다"),
            Err(err) => TaskPayload::fail(err),
        })
    }
}

pub async fn find_task(db: &DatabaseConnection, id: i32) -> Result<task::Model, AppError> {
    TaskEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TaskNotFound))
}

async fn find_parent_task(db: &DatabaseConnection, id: i32) -> Result<task::Model, AppError> {
    TaskEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ParentTaskNotFound))
}

/// 에픽, 담당자, 할당자를 각각 확인하고 에픽 내 이름 중복을 검사한다
pub async fn create_task(
    db: &DatabaseConnection,
    input: CreateTaskInput,
) -> Result<task::Model, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::ValidationError(vec![ValidationFieldError {
            field: "name".to_string(),
            message: "태스크 이름은 필수입니다.".to_string(),
        }]));
    }

    let epic = find_epic(db, parse_id(&input.epic)?).await?;
    let owner = find_user(db, parse_id(&input.owner)?).await?;
    let assignee = find_user(db, parse_id(&input.assignee)?).await?;

    let parent_task_id = match &input.parent_task {
        Some(parent) => Some(find_parent_task(db, parse_id(parent)?).await?.id),
        None => None,
    };

    ensure_unique_task_name(db, epic.id, None, &input.name).await?;

    let now = Utc::now();
    let new_task = task::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        epic_id: Set(epic.id),
        owner_id: Set(owner.id),
        assignee_id: Set(Some(assignee.id)),
        task_type: Set(input.task_type.unwrap_or(TaskType::MainTask)),
        parent_task_id: Set(parent_task_id),
        is_completed: Set(input.is_completed.unwrap_or(false)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    let task = new_task.insert(db).await?;
    info!("태스크 생성됨: id={}, 에픽={}", task.id, task.epic_id);
    Ok(task)
}

pub async fn update_task(
    db: &DatabaseConnection,
    input: UpdateTaskInput,
) -> Result<task::Model, AppError> {
    let id = parse_id(&input.id)?;
    let found = find_task(db, id).await?;

    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::ValidationError(vec![ValidationFieldError {
                field: "name".to_string(),
                message: "태스크 이름은 비울 수 없습니다.".to_string(),
            }]));
        }
        ensure_unique_task_name(db, found.epic_id, Some(id), name).await?;
    }

    let assignee_id = match &input.assignee {
        Some(assignee) => Some(find_user(db, parse_id(assignee)?).await?.id),
        None => None,
    };

    let parent_task_id = match &input.parent_task {
        Some(parent) => Some(find_parent_task(db, parse_id(parent)?).await?.id),
        None => None,
    };

    let task = apply_task_update(found, &input, assignee_id, parent_task_id)
        .update(db)
        .await?;
    Ok(task)
}

fn apply_task_update(
    task: task::Model,
    input: &UpdateTaskInput,
    assignee_id: Option<i32>,
    parent_task_id: Option<i32>,
) -> task::ActiveModel {
    let mut model: task::ActiveModel = task.into();

    if let Some(name) = &input.name {
        model.name = Set(name.clone());
    }
    if let Some(description) = &input.description {
        model.description = Set(description.clone());
    }
    if let Some(assignee_id) = assignee_id {
        model.assignee_id = Set(Some(assignee_id));
    }
    if let Some(parent_task_id) = parent_task_id {
        model.parent_task_id = Set(Some(parent_task_id));
    }
    // None은 변경 없음, Some(false)는 false로 되돌림
    if let Some(is_completed) = input.is_completed {
        model.is_completed = Set(is_completed);
    }
    model.updated_at = Set(Utc::now().into());

    model
}

// 이름 중복은 같은 에픽 안에서만 본다
fn duplicate_task_query(epic_id: i32, exclude_id: Option<i32>, name: &str) -> Select<TaskEntity> {
    let mut query = TaskEntity::find()
        .filter(task::Column::EpicId.eq(epic_id))
        .filter(task::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(task::Column::Id.ne(id));
    }
    query
}

async fn ensure_unique_task_name(
    db: &DatabaseConnection,
    epic_id: i32,
    exclude_id: Option<i32>,
    name: &str,
) -> Result<(), AppError> {
    if duplicate_task_query(epic_id, exclude_id, name)
        .one(db)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::DuplicateTaskName));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::user::UserRole;
    use sea_orm::{ActiveValue, DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};

    fn sample_user(id: i32) -> user::Model {
        let now = Utc::now();
        user::Model {
            id,
            first_name: "수민".to_string(),
            last_name: "이".to_string(),
            user_name: format!("sumin{id}"),
            email: format!("sumin{id}@example.com"),
            password: "$2b$12$C8qQ3mLx1rN5yE9pT2uXhO".to_string(),
            mobile_number: format!("010987600{:02}", id),
            role: UserRole::Developer,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn sample_epic(id: i32) -> epic::Model {
        let now = Utc::now();
        epic::Model {
            id,
            name: "1분기 로드맵".to_string(),
            user_id: 1,
            is_completed: false,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn sample_task(id: i32, name: &str) -> task::Model {
        let now = Utc::now();
        task::Model {
            id,
            name: name.to_string(),
            description: "설명".to_string(),
            epic_id: 1,
            owner_id: 1,
            assignee_id: Some(2),
            task_type: TaskType::MainTask,
            parent_task_id: None,
            is_completed: false,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn valid_input() -> CreateTaskInput {
        CreateTaskInput {
            name: "로그인 개선".to_string(),
            description: "로그인 오류 메시지를 정리한다".to_string(),
            epic: ID::from("1"),
            owner: ID::from("1"),
            assignee: ID::from("2"),
            task_type: None,
            parent_task: None,
            is_completed: None,
        }
    }

    #[tokio::test]
    async fn create_task_fails_when_epic_is_missing() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<epic::Model>::new()])
            .into_connection();

        let err = create_task(&db, valid_input()).await.unwrap_err();
        assert!(matches!(err, AppError::ApiError(ErrorCode::EpicNotFound, _)));
    }

    #[tokio::test]
    async fn create_task_fails_when_owner_is_missing() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![sample_epic(1)]])
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let err = create_task(&db, valid_input()).await.unwrap_err();
        assert!(matches!(err, AppError::ApiError(ErrorCode::UserNotFound, _)));
    }

    #[tokio::test]
    async fn create_task_fails_when_assignee_is_missing() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![sample_epic(1)]])
            .append_query_results([vec![sample_user(1)], Vec::new()])
            .into_connection();

        let err = create_task(&db, valid_input()).await.unwrap_err();
        assert!(matches!(err, AppError::ApiError(ErrorCode::UserNotFound, _)));
    }

    #[tokio::test]
    async fn create_task_rejects_duplicate_name_in_epic() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![sample_epic(1)]])
            .append_query_results([vec![sample_user(1)], vec![sample_user(2)]])
            .append_query_results([vec![sample_task(9, "로그인 개선")]])
            .into_connection();

        let err = create_task(&db, valid_input()).await.unwrap_err();
        assert!(matches!(err, AppError::ApiError(ErrorCode::DuplicateTaskName, _)));
    }

    #[tokio::test]
    async fn create_task_inserts_when_name_is_unique_in_epic() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![sample_epic(1)]])
            .append_query_results([vec![sample_user(1)], vec![sample_user(2)]])
            .append_query_results([Vec::<task::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 4,
                rows_affected: 1,
            }])
            .append_query_results([vec![sample_task(4, "로그인 개선")]])
            .into_connection();

        let task = create_task(&db, valid_input()).await.unwrap();
        assert_eq!(task.id, 4);
    }

    #[test]
    fn duplicate_check_is_scoped_to_the_epic() {
        let sql = duplicate_task_query(7, None, "로그인 개선")
            .build(DatabaseBackend::MySql)
            .to_string();
        assert!(sql.contains("`epic_id` = 7"));
        assert!(sql.contains("로그인 개선"));
    }

    #[test]
    fn duplicate_check_excludes_the_task_itself_on_rename() {
        let sql = duplicate_task_query(7, Some(3), "로그인 개선")
            .build(DatabaseBackend::MySql)
            .to_string();
        assert!(sql.contains("`id` <> 3"));
    }

    #[tokio::test]
    async fn update_task_fails_when_parent_is_missing() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![sample_task(3, "로그인 개선")]])
            .append_query_results([Vec::<task::Model>::new()])
            .into_connection();

        let input = UpdateTaskInput {
            id: ID::from("3"),
            name: None,
            description: None,
            assignee: None,
            parent_task: Some(ID::from("99")),
            is_completed: None,
        };
        let err = update_task(&db, input).await.unwrap_err();
        assert!(matches!(err, AppError::ApiError(ErrorCode::ParentTaskNotFound, _)));
    }

    #[test]
    fn update_keeps_unsupplied_fields() {
        let input = UpdateTaskInput {
            id: ID::from("3"),
            name: None,
            description: Some("설명 보강".to_string()),
            assignee: None,
            parent_task: None,
            is_completed: None,
        };

        let model = apply_task_update(sample_task(3, "로그인 개선"), &input, None, None);
        assert!(matches!(model.description, ActiveValue::Set(_)));
        assert!(matches!(model.name, ActiveValue::Unchanged(_)));
        assert!(matches!(model.assignee_id, ActiveValue::Unchanged(_)));
        assert!(matches!(model.is_completed, ActiveValue::Unchanged(_)));
    }

    #[test]
    fn update_accepts_explicit_false_completion() {
        let input = UpdateTaskInput {
            id: ID::from("3"),
            name: None,
            description: None,
            assignee: None,
            parent_task: None,
            is_completed: Some(false),
        };

        let mut completed = sample_task(3, "로그인 개선");
        completed.is_completed = true;

        let model = apply_task_update(completed, &input, None, None);
        assert!(matches!(model.is_completed, ActiveValue::Set(false)));
    }
}
