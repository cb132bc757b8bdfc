use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::directors::{CreateDirectorRequest, DirectorList, UpdateDirectorRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::DirectorView,
    response::ApiResponse,
    routes::params::Pagination,
    services::director_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_directors).post(create_director))
        .route(
            "/{id}",
            get(get_director).put(update_director).delete(delete_director),
        )
}

#[utoipa::path(
    get,
    path = "/api/directors",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List directors ordered by surname and name", body = ApiResponse<DirectorList>)
    ),
    tag = "Directors"
)]
pub async fn list_directors(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<DirectorList>>> {
    let resp = director_service::list_directors(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/directors/{id}",
    params(("id" = i32, Path, description = "Director ID")),
    responses(
        (status = 200, description = "Get director", body = ApiResponse<DirectorView>),
        (status = 404, description = "Director not found"),
    ),
    tag = "Directors"
)]
pub async fn get_director(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<DirectorView>>> {
    let resp = director_service::get_director(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/directors",
    request_body = CreateDirectorRequest,
    responses(
        (status = 200, description = "Create director", body = ApiResponse<DirectorView>),
        (status = 409, description = "Director with the same full name already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Directors"
)]
pub async fn create_director(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateDirectorRequest>,
) -> AppResult<Json<ApiResponse<DirectorView>>> {
    let resp = director_service::create_director(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/directors/{id}",
    params(("id" = i32, Path, description = "Director ID")),
    request_body = UpdateDirectorRequest,
    responses(
        (status = 200, description = "Update director", body = ApiResponse<DirectorView>),
        (status = 404, description = "Director not found"),
        (status = 409, description = "Director with the same full name already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Directors"
)]
pub async fn update_director(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateDirectorRequest>,
) -> AppResult<Json<ApiResponse<DirectorView>>> {
    let resp = director_service::update_director(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/directors/{id}",
    params(("id" = i32, Path, description = "Director ID")),
    responses(
        (status = 200, description = "Delete director"),
        (status = 404, description = "Director not found"),
        (status = 409, description = "Director has movies and can't be deleted"),
    ),
    security(("bearer_auth" = [])),
    tag = "Directors"
)]
pub async fn delete_director(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = director_service::delete_director(&state, &user, id).await?;
    Ok(Json(resp))
}
