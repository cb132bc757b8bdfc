use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        directors::{CreateDirectorRequest, DirectorList, UpdateDirectorRequest},
        genres::{CreateGenreRequest, GenreList, UpdateGenreRequest},
        movies::{CreateMovieRequest, MovieList, UpdateMovieRequest},
        roles::{CreateRoleRequest, RoleList, UpdateRoleRequest},
        users::{CreateUserRequest, UpdateUserRequest, UserList},
    },
    entity::users::Status,
    models::{DirectorView, GenreView, MovieView, RoleView, UserView},
    response::{ApiResponse, Meta},
    routes::{auth, directors, genres, health, health::HealthData, movies, params, roles, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        roles::list_roles,
        roles::get_role,
        roles::create_role,
        roles::update_role,
        roles::delete_role,
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        genres::update_genre,
        genres::delete_genre,
        movies::list_movies,
        movies::get_movie,
        movies::create_movie,
        movies::update_movie,
        movies::delete_movie,
        directors::list_directors,
        directors::get_director,
        directors::create_director,
        directors::update_director,
        directors::delete_director,
    ),
    components(
        schemas(
            Status,
            UserView,
            RoleView,
            GenreView,
            MovieView,
            DirectorView,
            LoginRequest,
            LoginResponse,
            CreateUserRequest,
            UpdateUserRequest,
            UserList,
            CreateRoleRequest,
            UpdateRoleRequest,
            RoleList,
            CreateGenreRequest,
            UpdateGenreRequest,
            GenreList,
            CreateMovieRequest,
            UpdateMovieRequest,
            MovieList,
            CreateDirectorRequest,
            UpdateDirectorRequest,
            DirectorList,
            params::Pagination,
            Meta,
            ApiResponse<UserView>,
            ApiResponse<UserList>,
            ApiResponse<RoleView>,
            ApiResponse<RoleList>,
            ApiResponse<GenreView>,
            ApiResponse<GenreList>,
            ApiResponse<MovieView>,
            ApiResponse<MovieList>,
            ApiResponse<DirectorView>,
            ApiResponse<DirectorList>,
            ApiResponse<LoginResponse>,
            HealthData,
            ApiResponse<HealthData>,
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Login and logout"),
        (name = "Users", description = "User endpoints"),
        (name = "Roles", description = "Role endpoints"),
        (name = "Genres", description = "Genre endpoints"),
        (name = "Movies", description = "Movie endpoints"),
        (name = "Directors", description = "Director endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
