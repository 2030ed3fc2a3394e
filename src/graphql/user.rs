use async_graphql::{ComplexObject, Context, ErrorExtensions, ID, Object, Result};
use bcrypt::{DEFAULT_COST, hash};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set,
};
use sea_query::Condition;
use tracing::{info, warn};

use crate::entity::epic::{self, Entity as EpicEntity};
use crate::entity::task::{self, Entity as TaskEntity};
use crate::entity::user::{self, Entity as UserEntity};
use crate::graphql::parse_id;
use crate::model::global_error::{AppError, ErrorCode, ValidationFieldError};
use crate::model::user::{CreateUserInput, UpdateUserInput, UserPayload};
use crate::util::validation::is_valid_email;

#[ComplexObject]
impl user::Model {
    /// 사용자가 생성한 에픽 목록
    async fn epics(&self, ctx: &Context<'_>) -> Result<Vec<epic::Model>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let epics = EpicEntity::find()
            .filter(epic::Column::UserId.eq(self.id))
            .all(db)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(epics)
    }

    /// 사용자가 생성한 에픽 수
    async fn epic_count(&self, ctx: &Context<'_>) -> Result<u64> {
        let db = ctx.data::<DatabaseConnection>()?;
        let count = EpicEntity::find()
            .filter(epic::Column::UserId.eq(self.id))
            .count(db)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(count)
    }
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// 전체 사용자 목록 조회
    async fn all_users(&self, ctx: &Context<'_>) -> Result<Vec<user::Model>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let users = UserEntity::find()
            .all(db)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(users)
    }

    /// 사용자 단건 조회
    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<user::Model> {
        let db = ctx.data::<DatabaseConnection>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;
        let user = find_user(db, id).await.map_err(|e| e.extend())?;
        Ok(user)
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// 사용자 생성
    async fn create_user(&self, ctx: &Context<'_>, input: CreateUserInput) -> Result<UserPayload> {
        let db = ctx.data::<DatabaseConnection>()?;
        Ok(match create_user(db, input).await {
            Ok(user) => UserPayload::ok(user, "사용자가 생성되었습니다"),
            Err(err) => UserPayload::fail(err),
        })
    }

    /// 사용자 수정 (전달된 필드만 반영)
    async fn update_user(&self, ctx: &Context<'_>, input: UpdateUserInput) -> Result<UserPayload> {
        let db = ctx.data::<DatabaseConnection>()?;
        Ok(match update_user(db, input).await {
            Ok(user) => UserPayload::ok(user, "사용자가 수정되었습니다"),
            Err(err) => UserPayload::fail(err),
        })
    }

    /// 사용자 삭제. 태스크나 에픽이 남아 있으면 차단된다
    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> Result<UserPayload> {
        let db = ctx.data::<DatabaseConnection>()?;
        let result = match parse_id(&id) {
            Ok(id) => delete_user(db, id).await,
            Err(err) => Err(err),
        };
        Ok(match result {
            Ok(user) => UserPayload::ok(user, "사용자가 삭제되었습니다"),
            Err(err) => UserPayload::fail(err),
        })
    }
}

pub async fn find_user(db: &DatabaseConnection, id: i32) -> Result<user::Model, AppError> {
    UserEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))
}

pub async fn create_user(
    db: &DatabaseConnection,
    input: CreateUserInput,
) -> Result<user::Model, AppError> {
    validate_create_user(&input)?;

    ensure_unique_user_name(db, None, &input.user_name).await?;
    ensure_unique_email(db, None, &input.email).await?;
    ensure_unique_mobile_number(db, None, &input.mobile_number).await?;

    let hashed_password =
        hash(&input.password, DEFAULT_COST).map_err(|_| AppError::new(ErrorCode::InternalError))?;

    let now = Utc::now();
    let new_user = user::ActiveModel {
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        user_name: Set(input.user_name),
        email: Set(input.email),
        password: Set(hashed_password),
        mobile_number: Set(input.mobile_number),
        role: Set(input.role),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    let user = new_user.insert(db).await?;
    info!("사용자 생성됨: id={}", user.id);
    Ok(user)
}

pub async fn update_user(
    db: &DatabaseConnection,
    input: UpdateUserInput,
) -> Result<user::Model, AppError> {
    let id = parse_id(&input.id)?;
    let found = find_user(db, id).await?;

    validate_update_user(&input)?;

    if let Some(user_name) = &input.user_name {
        ensure_unique_user_name(db, Some(id), user_name).await?;
    }
    if let Some(email) = &input.email {
        ensure_unique_email(db, Some(id), email).await?;
    }
    if let Some(mobile_number) = &input.mobile_number {
        ensure_unique_mobile_number(db, Some(id), mobile_number).await?;
    }

    let user = apply_user_update(found, &input).update(db).await?;
    Ok(user)
}

/// 태스크(담당 또는 할당)나 에픽이 남아 있으면 차단 대상의 이름을 담아 실패한다
pub async fn delete_user(db: &DatabaseConnection, id: i32) -> Result<user::Model, AppError> {
    let found = find_user(db, id).await?;

    let blocking_tasks = TaskEntity::find()
        .filter(
            Condition::any()
                .add(task::Column::OwnerId.eq(id))
                .add(task::Column::AssigneeId.eq(id)),
        )
        .all(db)
        .await?;

    if !blocking_tasks.is_empty() {
        let names = blocking_tasks
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        warn!("사용자 삭제 차단됨: id={}, 태스크={}", id, names);
        return Err(AppError::with_detail(ErrorCode::UserHasTasks, names));
    }

    let blocking_epics = EpicEntity::find()
        .filter(epic::Column::UserId.eq(id))
        .all(db)
        .await?;

    if !blocking_epics.is_empty() {
        let names = blocking_epics
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        warn!("사용자 삭제 차단됨: id={}, 에픽={}", id, names);
        return Err(AppError::with_detail(ErrorCode::UserHasEpics, names));
    }

    found.clone().delete(db).await?;
    info!("사용자 삭제됨: id={}", id);
    Ok(found)
}

fn apply_user_update(user: user::Model, input: &UpdateUserInput) -> user::ActiveModel {
    let mut model: user::ActiveModel = user.into();

    if let Some(first_name) = &input.first_name {
        model.first_name = Set(first_name.clone());
    }
    if let Some(last_name) = &input.last_name {
        model.last_name = Set(last_name.clone());
    }
    if let Some(user_name) = &input.user_name {
        model.user_name = Set(user_name.clone());
    }
    if let Some(email) = &input.email {
        model.email = Set(email.clone());
    }
    if let Some(mobile_number) = &input.mobile_number {
        model.mobile_number = Set(mobile_number.clone());
    }
    if let Some(role) = input.role {
        model.role = Set(role);
    }
    model.updated_at = Set(Utc::now().into());

    model
}

fn validate_create_user(input: &CreateUserInput) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if input.first_name.trim().is_empty() {
        errors.push(ValidationFieldError {
            field: "first_name".to_string(),
            message: "이름은 필수입니다.".to_string(),
        });
    }

    if input.last_name.trim().is_empty() {
        errors.push(ValidationFieldError {
            field: "last_name".to_string(),
            message: "성은 필수입니다.".to_string(),
        });
    }

    if input.user_name.trim().is_empty() {
        errors.push(ValidationFieldError {
            field: "user_name".to_string(),
            message: "사용자명은 필수입니다.".to_string(),
        });
    }

    if input.email.trim().is_empty() {
        errors.push(ValidationFieldError {
            field: "email".to_string(),
            message: "이메일은 필수입니다.".to_string(),
        });
    } else if !is_valid_email(&input.email) {
        errors.push(ValidationFieldError {
            field: "email".to_string(),
            message: "유효한 이메일 형식이 아닙니다.".to_string(),
        });
    }

    if input.password.len() < 8 {
        errors.push(ValidationFieldError {
            field: "password".to_string(),
            message: "비밀번호는 최소 8자 이상이어야 합니다.".to_string(),
        });
    }

    if input.mobile_number.len() < 10 {
        errors.push(ValidationFieldError {
            field: "mobile_number".to_string(),
            message: "휴대폰 번호는 최소 10자리 이상이어야 합니다.".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors))
    }
}

fn validate_update_user(input: &UpdateUserInput) -> Result<(), AppError> {
    let mut errors = Vec::new();

    for (field, value, message) in [
        ("first_name", &input.first_name, "이름은 비울 수 없습니다."),
        ("last_name", &input.last_name, "성은 비울 수 없습니다."),
        ("user_name", &input.user_name, "사용자명은 비울 수 없습니다."),
    ] {
        if let Some(value) = value {
            if value.trim().is_empty() {
                errors.push(ValidationFieldError {
                    field: field.to_string(),
                    message: message.to_string(),
                });
            }
        }
    }

    if let Some(email) = &input.email {
        if !is_valid_email(email) {
            errors.push(ValidationFieldError {
                field: "email".to_string(),
                message: "유효한 이메일 형식이 아닙니다.".to_string(),
            });
        }
    }

    if let Some(mobile_number) = &input.mobile_number {
        if mobile_number.len() < 10 {
            errors.push(ValidationFieldError {
                field: "mobile_number".to_string(),
                message: "휴대폰 번호는 최소 10자리 이상이어야 합니다.".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors))
    }
}

async fn ensure_unique_user_name(
    db: &DatabaseConnection,
    exclude_id: Option<i32>,
    user_name: &str,
) -> Result<(), AppError> {
    let mut query = UserEntity::find().filter(user::Column::UserName.eq(user_name));
    if let Some(id) = exclude_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(AppError::new(ErrorCode::DuplicateUserName));
    }
    Ok(())
}

async fn ensure_unique_email(
    db: &DatabaseConnection,
    exclude_id: Option<i32>,
    email: &str,
) -> Result<(), AppError> {
    let mut query = UserEntity::find().filter(user::Column::Email.eq(email));
    if let Some(id) = exclude_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(AppError::new(ErrorCode::DuplicateEmail));
    }
    Ok(())
}

async fn ensure_unique_mobile_number(
    db: &DatabaseConnection,
    exclude_id: Option<i32>,
    mobile_number: &str,
) -> Result<(), AppError> {
    let mut query = UserEntity::find().filter(user::Column::MobileNumber.eq(mobile_number));
    if let Some(id) = exclude_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(AppError::new(ErrorCode::DuplicateMobileNumber));
    }
    Ok(())
}
