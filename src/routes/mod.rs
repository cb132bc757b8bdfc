use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod directors;
pub mod doc;
pub mod genres;
pub mod health;
pub mod movies;
pub mod params;
pub mod roles;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/roles", roles::router())
        .nest("/genres", genres::router())
        .nest("/movies", movies::router())
        .nest("/directors", directors::router())
}
