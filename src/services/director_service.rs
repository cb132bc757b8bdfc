use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    dto::directors::{CreateDirectorRequest, DirectorList, UpdateDirectorRequest},
    entity::{
        directors::{
            ActiveModel as DirectorActive, Column as DirectorCol, Entity as Directors,
            Model as DirectorModel,
        },
        movies::{Column as MovieCol, Entity as Movies},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::DirectorView,
    naming::name_taken,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Inert director query with the fixed sort: surname then name ascending.
fn query() -> Select<Directors> {
    Directors::find()
        .order_by_asc(DirectorCol::Surname)
        .order_by_asc(DirectorCol::Name)
}

// Uniqueness for directors is on the full "Name Surname" pair.
fn full_name(name: &str, surname: &str) -> String {
    format!("{} {}", name.trim(), surname.trim())
}

pub async fn list_directors(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<DirectorList>> {
    let (page, limit, offset) = pagination.normalize();

    let total = query().count(&state.orm).await? as i64;
    let directors = query()
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let counts = movie_counts(state, directors.iter().map(|d| d.id).collect()).await?;
    let items = directors
        .into_iter()
        .map(|d| {
            let count = counts.get(&d.id).copied().unwrap_or(0);
            director_view(d, count)
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Directors",
        DirectorList { items },
        Some(meta),
    ))
}

pub async fn get_director(state: &AppState, id: i32) -> AppResult<ApiResponse<DirectorView>> {
    let director = query()
        .filter(DirectorCol::Id.eq(id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Director not found!".into()))?;

    let count = Movies::find()
        .filter(MovieCol::DirectorId.eq(director.id))
        .count(&state.orm)
        .await? as i64;

    Ok(ApiResponse::success(
        "Director",
        director_view(director, count),
        None,
    ))
}

pub async fn create_director(
    state: &AppState,
    user: &AuthUser,
    payload: CreateDirectorRequest,
) -> AppResult<ApiResponse<DirectorView>> {
    ensure_admin(user)?;

    let existing = Directors::find().all(&state.orm).await?;
    let names: Vec<(i32, String)> = existing
        .iter()
        .map(|d| (d.id, full_name(&d.name, &d.surname)))
        .collect();
    if name_taken(
        names.iter().map(|(id, name)| (*id, name.as_str())),
        &full_name(&payload.name, &payload.surname),
        None,
    ) {
        return Err(AppError::Conflict(
            "Director with the same full name already exists!".into(),
        ));
    }

    let director = DirectorActive {
        id: NotSet,
        name: Set(payload.name.trim().to_string()),
        surname: Set(payload.surname.trim().to_string()),
        is_retired: Set(payload.is_retired),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Director added successfully.",
        director_view(director, 0),
        Some(Meta::empty()),
    ))
}

pub async fn update_director(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateDirectorRequest,
) -> AppResult<ApiResponse<DirectorView>> {
    ensure_admin(user)?;

    let existing = Directors::find().all(&state.orm).await?;
    let names: Vec<(i32, String)> = existing
        .iter()
        .map(|d| (d.id, full_name(&d.name, &d.surname)))
        .collect();
    if name_taken(
        names.iter().map(|(id, name)| (*id, name.as_str())),
        &full_name(&payload.name, &payload.surname),
        Some(id),
    ) {
        return Err(AppError::Conflict(
            "Director with the same full name already exists!".into(),
        ));
    }

    let director = Directors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Director not found!".into()))?;

    let mut active: DirectorActive = director.into();
    active.name = Set(payload.name.trim().to_string());
    active.surname = Set(payload.surname.trim().to_string());
    active.is_retired = Set(payload.is_retired);
    let director = active.update(&state.orm).await?;

    let count = Movies::find()
        .filter(MovieCol::DirectorId.eq(director.id))
        .count(&state.orm)
        .await? as i64;

    Ok(ApiResponse::success(
        "Director updated successfully.",
        director_view(director, count),
        Some(Meta::empty()),
    ))
}

pub async fn delete_director(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let director = Directors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Director not found!".into()))?;

    // Movies reference directors; a director in use is rejected, never cascaded.
    let dependents = Movies::find()
        .filter(MovieCol::DirectorId.eq(director.id))
        .count(&state.orm)
        .await?;
    if dependents > 0 {
        return Err(AppError::Conflict(
            "Director can't be deleted because it has movies!".into(),
        ));
    }

    Directors::delete_by_id(director.id).exec(&state.orm).await?;

    Ok(ApiResponse::success(
        "Director deleted successfully.",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn movie_counts(state: &AppState, director_ids: Vec<i32>) -> AppResult<HashMap<i32, i64>> {
    if director_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let movies = Movies::find()
        .filter(MovieCol::DirectorId.is_in(director_ids))
        .all(&state.orm)
        .await?;

    let mut counts = HashMap::new();
    for m in movies {
        *counts.entry(m.director_id).or_insert(0) += 1;
    }
    Ok(counts)
}

fn director_view(model: DirectorModel, movie_count: i64) -> DirectorView {
    DirectorView {
        full_name: full_name(&model.name, &model.surname),
        id: model.id,
        name: model.name,
        surname: model.surname,
        is_retired: model.is_retired,
        movie_count,
    }
}
