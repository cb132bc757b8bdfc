use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    dto::roles::{CreateRoleRequest, RoleList, UpdateRoleRequest},
    entity::{
        roles::{ActiveModel as RoleActive, Column as RoleCol, Entity as Roles, Model as RoleModel},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::RoleView,
    naming::name_taken,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Inert, ordered role query; nothing runs until the caller materializes it.
fn query() -> Select<Roles> {
    Roles::find().order_by_asc(RoleCol::Name)
}

pub async fn list_roles(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<RoleList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize();

    let total = query().count(&state.orm).await? as i64;
    let roles = query()
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let counts = user_counts(state, roles.iter().map(|r| r.id).collect()).await?;
    let items = roles
        .into_iter()
        .map(|r| {
            let count = counts.get(&r.id).copied().unwrap_or(0);
            role_view(r, count)
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Roles", RoleList { items }, Some(meta)))
}

pub async fn get_role(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<RoleView>> {
    ensure_admin(user)?;
    let role = query()
        .filter(RoleCol::Id.eq(id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Role not found!".into()))?;

    let count = Users::find()
        .filter(UserCol::RoleId.eq(role.id))
        .count(&state.orm)
        .await? as i64;

    Ok(ApiResponse::success("Role", role_view(role, count), None))
}

pub async fn create_role(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRoleRequest,
) -> AppResult<ApiResponse<RoleView>> {
    ensure_admin(user)?;

    // The existing rows come back through a raw parameterized query; the
    // case-insensitive comparison itself stays ordinal and in-process.
    let existing: Vec<(i32, String)> = sqlx::query_as("SELECT id, name FROM roles")
        .fetch_all(&state.pool)
        .await?;
    if name_taken(
        existing.iter().map(|(id, name)| (*id, name.as_str())),
        &payload.name,
        None,
    ) {
        return Err(AppError::Conflict(
            "Role with the same name already exists!".into(),
        ));
    }

    let role = RoleActive {
        id: NotSet,
        name: Set(payload.name.trim().to_string()),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Role added successfully.",
        role_view(role, 0),
        Some(Meta::empty()),
    ))
}

pub async fn update_role(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateRoleRequest,
) -> AppResult<ApiResponse<RoleView>> {
    ensure_admin(user)?;

    let existing: Vec<(i32, String)> = sqlx::query_as("SELECT id, name FROM roles")
        .fetch_all(&state.pool)
        .await?;
    if name_taken(
        existing.iter().map(|(id, name)| (*id, name.as_str())),
        &payload.name,
        Some(id),
    ) {
        return Err(AppError::Conflict(
            "Role with the same name already exists!".into(),
        ));
    }

    let role = Roles::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Role not found!".into()))?;

    let mut active: RoleActive = role.into();
    active.name = Set(payload.name.trim().to_string());
    let role = active.update(&state.orm).await?;

    let count = Users::find()
        .filter(UserCol::RoleId.eq(role.id))
        .count(&state.orm)
        .await? as i64;

    Ok(ApiResponse::success(
        "Role updated successfully.",
        role_view(role, count),
        Some(Meta::empty()),
    ))
}

pub async fn delete_role(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let role = Roles::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Role not found!".into()))?;

    // Users reference roles; a role in use is rejected, never cascaded.
    let dependents = Users::find()
        .filter(UserCol::RoleId.eq(role.id))
        .count(&state.orm)
        .await?;
    if dependents > 0 {
        return Err(AppError::Conflict(
            "Role can't be deleted because it has users!".into(),
        ));
    }

    Roles::delete_by_id(role.id).exec(&state.orm).await?;

    Ok(ApiResponse::success(
        "Role deleted successfully.",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn user_counts(state: &AppState, role_ids: Vec<i32>) -> AppResult<HashMap<i32, i64>> {
    if role_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = Users::find()
        .filter(UserCol::RoleId.is_in(role_ids))
        .all(&state.orm)
        .await?;

    let mut counts = HashMap::new();
    for u in users {
        *counts.entry(u.role_id).or_insert(0) += 1;
    }
    Ok(counts)
}

fn role_view(model: RoleModel, user_count: i64) -> RoleView {
    RoleView {
        id: model.id,
        name: model.name,
        user_count,
    }
}
