use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::GenreView;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGenreRequest {
    pub name: String,
    /// Related movie ids; absent means no relations.
    pub movie_ids: Option<Vec<i32>>,
}

/// The submitted id list replaces the genre's join rows wholesale.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateGenreRequest {
    pub name: String,
    pub movie_ids: Option<Vec<i32>>,
}

#[derive(Serialize, ToSchema)]
pub struct GenreList {
    pub items: Vec<GenreView>,
}
