use async_graphql::{ComplexObject, Context, ErrorExtensions, ID, Object, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tracing::info;

use crate::entity::epic::{self, Entity as EpicEntity};
use crate::entity::task::{self, Entity as TaskEntity};
use crate::graphql::parse_id;
use crate::graphql::user::find_user;
use crate::model::global_error::{AppError, ErrorCode, ValidationFieldError};
use crate::model::epic::{CreateEpicInput, EpicPayload, UpdateEpicInput};

#[ComplexObject]
impl epic::Model {
    /// 에픽에 속한 태스크 목록
    async fn tasks(&self, ctx: &Context<'_>) -> Result<Vec<task::Model>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let tasks = TaskEntity::find()
            .filter(task::Column::EpicId.eq(self.id))
            .all(db)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(tasks)
    }

    /// 에픽에 속한 태스크 수
    async fn task_count(&self, ctx: &Context<'_>) -> Result<u64> {
        let db = ctx.data::<DatabaseConnection>()?;
        let count = TaskEntity::find()
            .filter(task::Column::EpicId.eq(self.id))
            .count(db)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(count)
    }
}

#[derive(Default)]
pub struct EpicQuery;

#[Object]
impl EpicQuery {
    /// 전체 에픽 목록 조회
    async fn all_epics(&self, ctx: &Context<'_>) -> Result<Vec<epic::Model>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let epics = EpicEntity::find()
            .all(db)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(epics)
    }

    /// 에픽 단건 조회
    async fn epic(&self, ctx: &Context<'_>, id: ID) -> Result<epic::Model> {
        let db = ctx.data::<DatabaseConnection>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;
        let epic = find_epic(db, id).await.map_err(|e| e.extend())?;
        Ok(epic)
    }
}

#[derive(Default)]
pub struct EpicMutation;

#[Object]
impl EpicMutation {
    /// 에픽 생성
    async fn create_epic(&self, ctx: &Context<'_>, input: CreateEpicInput) -> Result<EpicPayload> {
        let db = ctx.data::<DatabaseConnection>()?;
        Ok(match create_epic(db, input).await {
            Ok(epic) => EpicPayload::ok(epic, "에픽이 생성되었습니다"),
            Err(err) => EpicPayload::fail(err),
        })
    }

    /// 에픽 수정 (전달된 필드만 반영)
    async fn update_epic(&self, ctx: &Context<'_>, input: UpdateEpicInput) -> Result<EpicPayload> {
        let db = ctx.data::<DatabaseConnection>()?;
        Ok(match update_epic(db, input).await {
            Ok(epic) => EpicPayload::ok(epic, "에픽이 수정되었습니다"),
            Err(err) => EpicPayload::fail(err),
        })
    }
}

pub async fn find_epic(db: &DatabaseConnection, id: i32) -> Result<epic::Model, AppError> {
    EpicEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EpicNotFound))
}

pub async fn create_epic(
    db: &DatabaseConnection,
    input: CreateEpicInput,
) -> Result<epic::Model, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::ValidationError(vec![ValidationFieldError {
            field: "name".to_string(),
            message: "에픽 이름은 필수입니다.".to_string(),
        }]));
    }

    let owner = find_user(db, parse_id(&input.user)?).await?;
    ensure_unique_epic_name(db, None, &input.name).await?;

    let now = Utc::now();
    let new_epic = epic::ActiveModel {
        name: Set(input.name),
        user_id: Set(owner.id),
        is_completed: Set(input.is_completed.unwrap_or(false)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    let epic = new_epic.insert(db).await?;
    info!("에픽 생성됨: id={}, 소유자={}", epic.id, owner.id);
    Ok(epic)
}

pub async fn update_epic(
    db: &DatabaseConnection,
    input: UpdateEpicInput,
) -> Result<epic::Model, AppError> {
    let id = parse_id(&input.id)?;
    let found = find_epic(db, id).await?;

    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::ValidationError(vec![ValidationFieldError {
                field: "name".to_string(),
                message: "에픽 이름은 비울 수 없습니다.".to_string(),
            }]));
        }
        ensure_unique_epic_name(db, Some(id), name).await?;
    }

    let epic = apply_epic_update(found, &input).update(db).await?;
    Ok(epic)
}

fn apply_epic_update(epic: epic::Model, input: &UpdateEpicInput) -> epic::ActiveModel {
    let mut model: epic::ActiveModel = epic.into();

    if let Some(name) = &input.name {
        model.name = Set(name.clone());
    }
    // None은 변경 없음, Some(false)는 false로 되돌림
    if let Some(is_completed) = input.is_completed {
        model.is_completed = Set(is_completed);
    }
    model.updated_at = Set(Utc::now().into());

    model
}

async fn ensure_unique_epic_name(
    db: &DatabaseConnection,
    exclude_id: Option<i32>,
    name: &str,
) -> Result<(), AppError> {
    let mut query = EpicEntity::find().filter(epic::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(epic::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(AppError::new(ErrorCode::DuplicateEpicName));
    }
    Ok(())
}
