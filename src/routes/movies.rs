use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::movies::{CreateMovieRequest, MovieList, UpdateMovieRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::MovieView,
    response::ApiResponse,
    routes::params::Pagination,
    services::movie_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_movies).post(create_movie))
        .route(
            "/{id}",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
}

#[utoipa::path(
    get,
    path = "/api/movies",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List movies ordered by name", body = ApiResponse<MovieList>)
    ),
    tag = "Movies"
)]
pub async fn list_movies(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<MovieList>>> {
    let resp = movie_service::list_movies(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/movies/{id}",
    params(("id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Get movie with its director and genres", body = ApiResponse<MovieView>),
        (status = 404, description = "Movie not found"),
    ),
    tag = "Movies"
)]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<MovieView>>> {
    let resp = movie_service::get_movie(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/movies",
    request_body = CreateMovieRequest,
    responses(
        (status = 200, description = "Create movie with its genre relations", body = ApiResponse<MovieView>),
        (status = 409, description = "Movie with the same name already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Movies"
)]
pub async fn create_movie(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMovieRequest>,
) -> AppResult<Json<ApiResponse<MovieView>>> {
    let resp = movie_service::create_movie(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/movies/{id}",
    params(("id" = i32, Path, description = "Movie ID")),
    request_body = UpdateMovieRequest,
    responses(
        (status = 200, description = "Update movie, replacing its genre relations", body = ApiResponse<MovieView>),
        (status = 404, description = "Movie not found"),
        (status = 409, description = "Movie with the same name already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Movies"
)]
pub async fn update_movie(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMovieRequest>,
) -> AppResult<Json<ApiResponse<MovieView>>> {
    let resp = movie_service::update_movie(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/movies/{id}",
    params(("id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Delete movie and its genre relations"),
        (status = 404, description = "Movie not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Movies"
)]
pub async fn delete_movie(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = movie_service::delete_movie(&state, &user, id).await?;
    Ok(Json(resp))
}
