use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::genres::{CreateGenreRequest, GenreList, UpdateGenreRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::GenreView,
    response::ApiResponse,
    routes::params::Pagination,
    services::genre_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_genres).post(create_genre))
        .route(
            "/{id}",
            get(get_genre).put(update_genre).delete(delete_genre),
        )
}

#[utoipa::path(
    get,
    path = "/api/genres",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List genres ordered by name descending", body = ApiResponse<GenreList>)
    ),
    tag = "Genres"
)]
pub async fn list_genres(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<GenreList>>> {
    let resp = genre_service::list_genres(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/genres/{id}",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Get genre with its related movies", body = ApiResponse<GenreView>),
        (status = 404, description = "Genre not found"),
    ),
    tag = "Genres"
)]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<GenreView>>> {
    let resp = genre_service::get_genre(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/genres",
    request_body = CreateGenreRequest,
    responses(
        (status = 200, description = "Create genre with its movie relations", body = ApiResponse<GenreView>),
        (status = 409, description = "Genre with the same name exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Genres"
)]
pub async fn create_genre(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateGenreRequest>,
) -> AppResult<Json<ApiResponse<GenreView>>> {
    let resp = genre_service::create_genre(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/genres/{id}",
    params(("id" = i32, Path, description = "Genre ID")),
    request_body = UpdateGenreRequest,
    responses(
        (status = 200, description = "Update genre, replacing its movie relations", body = ApiResponse<GenreView>),
        (status = 404, description = "Genre not found"),
        (status = 409, description = "Genre with the same name exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Genres"
)]
pub async fn update_genre(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateGenreRequest>,
) -> AppResult<Json<ApiResponse<GenreView>>> {
    let resp = genre_service::update_genre(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/genres/{id}",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Delete genre and its movie relations"),
        (status = 404, description = "Genre not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Genres"
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = genre_service::delete_genre(&state, &user, id).await?;
    Ok(Json(resp))
}
