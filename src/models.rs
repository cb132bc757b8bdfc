use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::users::Status;

/// Presentation model for a user row, joined with its role and carrying the
/// derived display fields; the stored password never leaves the service
/// unmasked.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserView {
    pub id: i32,
    pub username: String,
    pub password_masked: String,
    pub is_active: bool,
    pub is_active_display: String,
    pub status: Status,
    pub role_id: i32,
    pub role_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleView {
    pub id: i32,
    pub name: String,
    pub user_count: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenreView {
    pub id: i32,
    pub name: String,
    /// Ids of the related movies, for edit forms.
    pub movie_ids: Vec<i32>,
    /// Related movie names joined with ", ", for detail screens.
    pub movie_names: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MovieView {
    pub id: i32,
    pub name: String,
    pub release_date: Option<NaiveDate>,
    pub total_revenue: Option<f64>,
    pub director_id: i32,
    pub director_name: String,
    pub genre_ids: Vec<i32>,
    pub genre_names: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DirectorView {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub full_name: String,
    pub is_retired: bool,
    pub movie_count: i64,
}
