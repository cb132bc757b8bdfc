use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::MovieView;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMovieRequest {
    pub name: String,
    pub release_date: Option<NaiveDate>,
    pub total_revenue: Option<f64>,
    pub director_id: i32,
    /// Related genre ids; absent means no relations.
    pub genre_ids: Option<Vec<i32>>,
}

/// The submitted id list replaces the movie's join rows wholesale.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMovieRequest {
    pub name: String,
    pub release_date: Option<NaiveDate>,
    pub total_revenue: Option<f64>,
    pub director_id: i32,
    pub genre_ids: Option<Vec<i32>>,
}

#[derive(Serialize, ToSchema)]
pub struct MovieList {
    pub items: Vec<MovieView>,
}
