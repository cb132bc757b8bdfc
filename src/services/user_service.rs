use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    dto::users::{CreateUserRequest, UpdateUserRequest, UserList},
    entity::{
        roles::{Entity as Roles, Model as RoleModel},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::UserView,
    naming::{mask, name_taken},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Inert user query with the fixed sort: active users first, then username
/// ascending.
fn query() -> Select<Users> {
    Users::find()
        .order_by_desc(UserCol::IsActive)
        .order_by_asc(UserCol::Username)
}

pub async fn list_users(state: &AppState, pagination: Pagination) -> AppResult<ApiResponse<UserList>> {
    let (page, limit, offset) = pagination.normalize();

    let total = query().count(&state.orm).await? as i64;
    let rows = query()
        .find_also_related(Roles)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .map(|(user, role)| user_view(user, role))
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn get_user(state: &AppState, id: i32) -> AppResult<ApiResponse<UserView>> {
    let row = query()
        .filter(UserCol::Id.eq(id))
        .find_also_related(Roles)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found!".into()))?;

    let (user, role) = row;
    Ok(ApiResponse::success("User", user_view(user, role), None))
}

pub async fn create_user(
    state: &AppState,
    user: &AuthUser,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<UserView>> {
    ensure_admin(user)?;

    let existing = Users::find().all(&state.orm).await?;
    if name_taken(
        existing.iter().map(|u| (u.id, u.username.as_str())),
        &payload.username,
        None,
    ) {
        return Err(AppError::Conflict(
            "User with the same user name already exists!".into(),
        ));
    }

    let created = UserActive {
        id: NotSet,
        username: Set(payload.username.trim().to_string()),
        password: Set(payload.password.trim().to_string()),
        is_active: Set(payload.is_active),
        status: Set(payload.status),
        role_id: Set(payload.role_id.unwrap_or(0)),
    }
    .insert(&state.orm)
    .await?;

    let role = related_role(state, &created).await?;
    Ok(ApiResponse::success(
        "User added successfully.",
        user_view(created, role),
        Some(Meta::empty()),
    ))
}

pub async fn update_user(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<UserView>> {
    ensure_admin(user)?;

    let existing = Users::find().all(&state.orm).await?;
    if name_taken(
        existing.iter().map(|u| (u.id, u.username.as_str())),
        &payload.username,
        Some(id),
    ) {
        return Err(AppError::Conflict(
            "User with the same user name already exists!".into(),
        ));
    }

    let target = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found!".into()))?;

    // Full replacement of the mutable fields; there is no partial patch.
    let mut active: UserActive = target.into();
    active.username = Set(payload.username.trim().to_string());
    active.password = Set(payload.password.trim().to_string());
    active.is_active = Set(payload.is_active);
    active.status = Set(payload.status);
    active.role_id = Set(payload.role_id.unwrap_or(0));
    let updated = active.update(&state.orm).await?;

    let role = related_role(state, &updated).await?;
    Ok(ApiResponse::success(
        "User updated successfully.",
        user_view(updated, role),
        Some(Meta::empty()),
    ))
}

pub async fn delete_user(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = Users::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("User not found!".into()));
    }

    Ok(ApiResponse::success(
        "User deleted successfully.",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn related_role(state: &AppState, user: &UserModel) -> AppResult<Option<RoleModel>> {
    let role = Roles::find_by_id(user.role_id).one(&state.orm).await?;
    Ok(role)
}

fn user_view(model: UserModel, role: Option<RoleModel>) -> UserView {
    UserView {
        id: model.id,
        username: model.username.clone(),
        password_masked: mask(&model.password),
        is_active: model.is_active,
        is_active_display: if model.is_active { "Yes" } else { "No" }.to_string(),
        status: model.status,
        role_id: model.role_id,
        role_name: role.map(|r| r.name).unwrap_or_default(),
    }
}
