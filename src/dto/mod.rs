pub mod auth;
pub mod directors;
pub mod genres;
pub mod movies;
pub mod roles;
pub mod users;
