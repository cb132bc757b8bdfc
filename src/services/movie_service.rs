use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    dto::movies::{CreateMovieRequest, MovieList, UpdateMovieRequest},
    entity::{
        directors::{Entity as Directors, Model as DirectorModel},
        genres::{Column as GenreCol, Entity as Genres},
        movie_genres::{
            ActiveModel as MovieGenreActive, Column as MovieGenreCol, Entity as MovieGenres,
        },
        movies::{ActiveModel as MovieActive, Column as MovieCol, Entity as Movies, Model as MovieModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::MovieView,
    naming::name_taken,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Inert movie query with the fixed sort: name ascending.
fn query() -> Select<Movies> {
    Movies::find().order_by_asc(MovieCol::Name)
}

pub async fn list_movies(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<MovieList>> {
    let (page, limit, offset) = pagination.normalize();

    let total = query().count(&state.orm).await? as i64;
    let rows = query()
        .find_also_related(Directors)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let relations =
        genre_relations(state, rows.iter().map(|(m, _)| m.id).collect()).await?;
    let items = rows
        .into_iter()
        .map(|(movie, director)| {
            let (genre_ids, genre_names) = relations.get(&movie.id).cloned().unwrap_or_default();
            movie_view(movie, director, genre_ids, genre_names)
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Movies", MovieList { items }, Some(meta)))
}

pub async fn get_movie(state: &AppState, id: i32) -> AppResult<ApiResponse<MovieView>> {
    let row = query()
        .filter(MovieCol::Id.eq(id))
        .find_also_related(Directors)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found!".into()))?;

    let (movie, director) = row;
    let relations = genre_relations(state, vec![movie.id]).await?;
    let (genre_ids, genre_names) = relations.get(&movie.id).cloned().unwrap_or_default();
    Ok(ApiResponse::success(
        "Movie",
        movie_view(movie, director, genre_ids, genre_names),
        None,
    ))
}

pub async fn create_movie(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMovieRequest,
) -> AppResult<ApiResponse<MovieView>> {
    ensure_admin(user)?;

    let existing = Movies::find().all(&state.orm).await?;
    if name_taken(
        existing.iter().map(|m| (m.id, m.name.as_str())),
        &payload.name,
        None,
    ) {
        return Err(AppError::Conflict(
            "Movie with the same name already exists!".into(),
        ));
    }

    let genre_ids = payload.genre_ids.unwrap_or_default();

    let txn = state.orm.begin().await?;
    let movie = MovieActive {
        id: NotSet,
        name: Set(payload.name.trim().to_string()),
        release_date: Set(payload.release_date),
        total_revenue: Set(payload.total_revenue),
        director_id: Set(payload.director_id),
    }
    .insert(&txn)
    .await?;
    insert_links(&txn, movie.id, &genre_ids).await?;
    txn.commit().await?;

    respond(state, movie, "Movie added successfully.").await
}

pub async fn update_movie(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateMovieRequest,
) -> AppResult<ApiResponse<MovieView>> {
    ensure_admin(user)?;

    let existing = Movies::find().all(&state.orm).await?;
    if name_taken(
        existing.iter().map(|m| (m.id, m.name.as_str())),
        &payload.name,
        Some(id),
    ) {
        return Err(AppError::Conflict(
            "Movie with the same name already exists!".into(),
        ));
    }

    let genre_ids = payload.genre_ids.unwrap_or_default();

    let txn = state.orm.begin().await?;
    let movie = Movies::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found!".into()))?;

    MovieGenres::delete_many()
        .filter(MovieGenreCol::MovieId.eq(movie.id))
        .exec(&txn)
        .await?;

    let mut active: MovieActive = movie.into();
    active.name = Set(payload.name.trim().to_string());
    active.release_date = Set(payload.release_date);
    active.total_revenue = Set(payload.total_revenue);
    active.director_id = Set(payload.director_id);
    let movie = active.update(&txn).await?;

    insert_links(&txn, movie.id, &genre_ids).await?;
    txn.commit().await?;

    respond(state, movie, "Movie updated successfully.").await
}

pub async fn delete_movie(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let movie = Movies::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found!".into()))?;

    MovieGenres::delete_many()
        .filter(MovieGenreCol::MovieId.eq(movie.id))
        .exec(&txn)
        .await?;
    Movies::delete_by_id(movie.id).exec(&txn).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Movie deleted successfully.",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn respond(
    state: &AppState,
    movie: MovieModel,
    message: &str,
) -> AppResult<ApiResponse<MovieView>> {
    let director = Directors::find_by_id(movie.director_id)
        .one(&state.orm)
        .await?;
    let relations = genre_relations(state, vec![movie.id]).await?;
    let (genre_ids, genre_names) = relations.get(&movie.id).cloned().unwrap_or_default();
    Ok(ApiResponse::success(
        message,
        movie_view(movie, director, genre_ids, genre_names),
        Some(Meta::empty()),
    ))
}

async fn insert_links<C: sea_orm::ConnectionTrait>(
    conn: &C,
    movie_id: i32,
    genre_ids: &[i32],
) -> AppResult<()> {
    if genre_ids.is_empty() {
        return Ok(());
    }
    let links: Vec<MovieGenreActive> = genre_ids
        .iter()
        .map(|genre_id| MovieGenreActive {
            movie_id: Set(movie_id),
            genre_id: Set(*genre_id),
        })
        .collect();
    MovieGenres::insert_many(links).exec(conn).await?;
    Ok(())
}

/// Related genre ids and a display string of genre names, per movie.
async fn genre_relations(
    state: &AppState,
    movie_ids: Vec<i32>,
) -> AppResult<HashMap<i32, (Vec<i32>, String)>> {
    if movie_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let links = MovieGenres::find()
        .filter(MovieGenreCol::MovieId.is_in(movie_ids))
        .all(&state.orm)
        .await?;

    let genre_ids: Vec<i32> = links.iter().map(|l| l.genre_id).collect();
    let genres = Genres::find()
        .filter(GenreCol::Id.is_in(genre_ids))
        .all(&state.orm)
        .await?;
    let genre_names: HashMap<i32, String> =
        genres.into_iter().map(|g| (g.id, g.name)).collect();

    let mut relations: HashMap<i32, (Vec<i32>, Vec<String>)> = HashMap::new();
    for link in links {
        let entry = relations.entry(link.movie_id).or_default();
        entry.0.push(link.genre_id);
        if let Some(name) = genre_names.get(&link.genre_id) {
            entry.1.push(name.clone());
        }
    }

    // Join rows come back in no particular order; sort before rendering.
    Ok(relations
        .into_iter()
        .map(|(movie_id, (mut ids, mut names))| {
            ids.sort_unstable();
            names.sort();
            (movie_id, (ids, names.join(", ")))
        })
        .collect())
}

fn movie_view(
    model: MovieModel,
    director: Option<DirectorModel>,
    genre_ids: Vec<i32>,
    genre_names: String,
) -> MovieView {
    MovieView {
        id: model.id,
        name: model.name,
        release_date: model.release_date,
        total_revenue: model.total_revenue,
        director_id: model.director_id,
        director_name: director
            .map(|d| format!("{} {}", d.name, d.surname))
            .unwrap_or_default(),
        genre_ids,
        genre_names,
    }
}
