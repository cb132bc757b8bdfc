pub mod directors;
pub mod genres;
pub mod movie_genres;
pub mod movies;
pub mod roles;
pub mod users;

pub use directors::Entity as Directors;
pub use genres::Entity as Genres;
pub use movie_genres::Entity as MovieGenres;
pub use movies::Entity as Movies;
pub use roles::Entity as Roles;
pub use users::Entity as Users;
