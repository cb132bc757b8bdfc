use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    dto::genres::{CreateGenreRequest, GenreList, UpdateGenreRequest},
    entity::{
        genres::{ActiveModel as GenreActive, Column as GenreCol, Entity as Genres, Model as GenreModel},
        movie_genres::{
            ActiveModel as MovieGenreActive, Column as MovieGenreCol, Entity as MovieGenres,
        },
        movies::{Column as MovieCol, Entity as Movies},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::GenreView,
    naming::name_taken,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Inert genre query with the fixed sort: name descending.
fn query() -> Select<Genres> {
    Genres::find().order_by_desc(GenreCol::Name)
}

pub async fn list_genres(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<GenreList>> {
    let (page, limit, offset) = pagination.normalize();

    let total = query().count(&state.orm).await? as i64;
    let genres = query()
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let relations = movie_relations(state, genres.iter().map(|g| g.id).collect()).await?;
    let items = genres
        .into_iter()
        .map(|g| {
            let (movie_ids, movie_names) = relations.get(&g.id).cloned().unwrap_or_default();
            genre_view(g, movie_ids, movie_names)
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Genres", GenreList { items }, Some(meta)))
}

pub async fn get_genre(state: &AppState, id: i32) -> AppResult<ApiResponse<GenreView>> {
    let genre = query()
        .filter(GenreCol::Id.eq(id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Genre not found!".into()))?;

    let relations = movie_relations(state, vec![genre.id]).await?;
    let (movie_ids, movie_names) = relations.get(&genre.id).cloned().unwrap_or_default();
    Ok(ApiResponse::success(
        "Genre",
        genre_view(genre, movie_ids, movie_names),
        None,
    ))
}

pub async fn create_genre(
    state: &AppState,
    user: &AuthUser,
    payload: CreateGenreRequest,
) -> AppResult<ApiResponse<GenreView>> {
    ensure_admin(user)?;

    let existing = Genres::find().all(&state.orm).await?;
    if name_taken(
        existing.iter().map(|g| (g.id, g.name.as_str())),
        &payload.name,
        None,
    ) {
        return Err(AppError::Conflict("Genre with the same name exists!".into()));
    }

    let movie_ids = payload.movie_ids.unwrap_or_default();

    // Row plus join rows commit together or not at all.
    let txn = state.orm.begin().await?;
    let genre = GenreActive {
        id: NotSet,
        name: Set(payload.name.trim().to_string()),
    }
    .insert(&txn)
    .await?;
    insert_links(&txn, genre.id, &movie_ids).await?;
    txn.commit().await?;

    let relations = movie_relations(state, vec![genre.id]).await?;
    let (movie_ids, movie_names) = relations.get(&genre.id).cloned().unwrap_or_default();
    Ok(ApiResponse::success(
        "Genre added successfully.",
        genre_view(genre, movie_ids, movie_names),
        Some(Meta::empty()),
    ))
}

pub async fn update_genre(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateGenreRequest,
) -> AppResult<ApiResponse<GenreView>> {
    ensure_admin(user)?;

    let existing = Genres::find().all(&state.orm).await?;
    if name_taken(
        existing.iter().map(|g| (g.id, g.name.as_str())),
        &payload.name,
        Some(id),
    ) {
        return Err(AppError::Conflict("Genre with the same name exists!".into()));
    }

    let movie_ids = payload.movie_ids.unwrap_or_default();

    let txn = state.orm.begin().await?;
    let genre = Genres::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Genre not found!".into()))?;

    // Replace-all semantics: the old join rows go away wholesale and the
    // submitted id list becomes the new relation set.
    MovieGenres::delete_many()
        .filter(MovieGenreCol::GenreId.eq(genre.id))
        .exec(&txn)
        .await?;

    let mut active: GenreActive = genre.into();
    active.name = Set(payload.name.trim().to_string());
    let genre = active.update(&txn).await?;

    insert_links(&txn, genre.id, &movie_ids).await?;
    txn.commit().await?;

    let relations = movie_relations(state, vec![genre.id]).await?;
    let (movie_ids, movie_names) = relations.get(&genre.id).cloned().unwrap_or_default();
    Ok(ApiResponse::success(
        "Genre updated successfully.",
        genre_view(genre, movie_ids, movie_names),
        Some(Meta::empty()),
    ))
}

pub async fn delete_genre(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let genre = Genres::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Genre not found!".into()))?;

    // Join rows first, then the row itself, in the same transaction.
    MovieGenres::delete_many()
        .filter(MovieGenreCol::GenreId.eq(genre.id))
        .exec(&txn)
        .await?;
    Genres::delete_by_id(genre.id).exec(&txn).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Genre deleted successfully.",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn insert_links<C: sea_orm::ConnectionTrait>(
    conn: &C,
    genre_id: i32,
    movie_ids: &[i32],
) -> AppResult<()> {
    if movie_ids.is_empty() {
        return Ok(());
    }
    let links: Vec<MovieGenreActive> = movie_ids
        .iter()
        .map(|movie_id| MovieGenreActive {
            movie_id: Set(*movie_id),
            genre_id: Set(genre_id),
        })
        .collect();
    MovieGenres::insert_many(links).exec(conn).await?;
    Ok(())
}

/// Related movie ids and a display string of movie names, per genre.
async fn movie_relations(
    state: &AppState,
    genre_ids: Vec<i32>,
) -> AppResult<HashMap<i32, (Vec<i32>, String)>> {
    if genre_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let links = MovieGenres::find()
        .filter(MovieGenreCol::GenreId.is_in(genre_ids))
        .all(&state.orm)
        .await?;

    let movie_ids: Vec<i32> = links.iter().map(|l| l.movie_id).collect();
    let movies = Movies::find()
        .filter(MovieCol::Id.is_in(movie_ids))
        .all(&state.orm)
        .await?;
    let movie_names: HashMap<i32, String> =
        movies.into_iter().map(|m| (m.id, m.name)).collect();

    let mut relations: HashMap<i32, (Vec<i32>, Vec<String>)> = HashMap::new();
    for link in links {
        let entry = relations.entry(link.genre_id).or_default();
        entry.0.push(link.movie_id);
        if let Some(name) = movie_names.get(&link.movie_id) {
            entry.1.push(name.clone());
        }
    }

    // Join rows come back in no particular order; sort before rendering.
    Ok(relations
        .into_iter()
        .map(|(genre_id, (mut ids, mut names))| {
            ids.sort_unstable();
            names.sort();
            (genre_id, (ids, names.join(", ")))
        })
        .collect())
}

fn genre_view(model: GenreModel, movie_ids: Vec<i32>, movie_names: String) -> GenreView {
    GenreView {
        id: model.id,
        name: model.name,
        movie_ids,
        movie_names,
    }
}
