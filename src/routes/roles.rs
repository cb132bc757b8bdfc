use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::roles::{CreateRoleRequest, RoleList, UpdateRoleRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::RoleView,
    response::ApiResponse,
    routes::params::Pagination,
    services::role_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route(
            "/{id}",
            get(get_role).put(update_role).delete(delete_role),
        )
}

#[utoipa::path(
    get,
    path = "/api/roles",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List roles ordered by name", body = ApiResponse<RoleList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn list_roles(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<RoleList>>> {
    let resp = role_service::list_roles(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    params(("id" = i32, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Get role", body = ApiResponse<RoleView>),
        (status = 404, description = "Role not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn get_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<RoleView>>> {
    let resp = role_service::get_role(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 200, description = "Create role", body = ApiResponse<RoleView>),
        (status = 409, description = "Role with the same name already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn create_role(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRoleRequest>,
) -> AppResult<Json<ApiResponse<RoleView>>> {
    let resp = role_service::create_role(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/roles/{id}",
    params(("id" = i32, Path, description = "Role ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Update role", body = ApiResponse<RoleView>),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Role with the same name already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn update_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRoleRequest>,
) -> AppResult<Json<ApiResponse<RoleView>>> {
    let resp = role_service::update_role(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    params(("id" = i32, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Delete role"),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Role has users and can't be deleted"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn delete_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = role_service::delete_role(&state, &user, id).await?;
    Ok(Json(resp))
}
