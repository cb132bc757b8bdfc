use axum_movie_catalog_api::{
    db::{create_orm_conn, create_pool},
    dto::{
        auth::LoginRequest,
        directors::CreateDirectorRequest,
        genres::{CreateGenreRequest, UpdateGenreRequest},
        movies::CreateMovieRequest,
        roles::{CreateRoleRequest, UpdateRoleRequest},
        users::CreateUserRequest,
    },
    entity::{
        genres::Entity as Genres,
        movie_genres::{Column as MovieGenreCol, Entity as MovieGenres},
        users::{Entity as Users, Status},
    },
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::Pagination,
    services::{auth_service, director_service, genre_service, movie_service, role_service, user_service},
    state::AppState,
};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Statement};

// Integration flow over the CRUD core: uniqueness checks, protected deletes,
// replace-all join handling, fixed sort orders and login.
#[tokio::test]
async fn crud_invariants_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };
    unsafe { std::env::set_var("JWT_SECRET", "integration-test-secret") };

    let state = setup_state(&database_url).await?;
    let admin = AuthUser {
        username: "admin".into(),
        role: "admin".into(),
    };

    // Base roles.
    let _admin_role = create_role(&state, &admin, "admin").await?;
    let user_role = create_role(&state, &admin, "user").await?;
    let tech_role = create_role(&state, &admin, "Tech").await?;

    // Duplicate add: second insert with the same trimmed name is rejected
    // regardless of case, and only one row is persisted.
    genre_service::create_genre(
        &state,
        &admin,
        CreateGenreRequest {
            name: "Comedy".into(),
            movie_ids: None,
        },
    )
    .await?;
    let err = genre_service::create_genre(
        &state,
        &admin,
        CreateGenreRequest {
            name: "  comedy ".into(),
            movie_ids: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(Genres::find().count(&state.orm).await?, 1);

    // Duplicate update: renaming Tech onto an existing role name is rejected
    // and the row is left unchanged.
    let err = role_service::update_role(
        &state,
        &admin,
        tech_role,
        UpdateRoleRequest { name: "USER".into() },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    let tech = role_service::get_role(&state, &admin, tech_role)
        .await?
        .data
        .unwrap();
    assert_eq!(tech.name, "Tech");

    // Protected delete: a role with users is rejected and nothing changes.
    create_user(&state, &admin, "mehmet", "pass123", true, user_role).await?;
    let err = role_service::delete_role(&state, &admin, user_role)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(Users::find().count(&state.orm).await?, 1);
    assert!(
        role_service::get_role(&state, &admin, user_role).await.is_ok(),
        "role with users must survive a rejected delete"
    );

    // A role without users deletes cleanly.
    role_service::delete_role(&state, &admin, tech_role).await?;
    let err = role_service::get_role(&state, &admin, tech_role)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Replace-all join handling on genre updates.
    let director = director_service::create_director(
        &state,
        &admin,
        CreateDirectorRequest {
            name: "Christopher".into(),
            surname: "Nolan".into(),
            is_retired: false,
        },
    )
    .await?
    .data
    .unwrap()
    .id;
    let m1 = create_movie(&state, &admin, "Inception", director).await?;
    let m2 = create_movie(&state, &admin, "Interstellar", director).await?;
    let m3 = create_movie(&state, &admin, "Dunkirk", director).await?;

    let drama = genre_service::create_genre(
        &state,
        &admin,
        CreateGenreRequest {
            name: "Drama".into(),
            movie_ids: Some(vec![m1, m2]),
        },
    )
    .await?
    .data
    .unwrap()
    .id;

    genre_service::update_genre(
        &state,
        &admin,
        drama,
        UpdateGenreRequest {
            name: "Drama".into(),
            movie_ids: Some(vec![m1, m3]),
        },
    )
    .await?;
    let mut ids = genre_service::get_genre(&state, drama)
        .await?
        .data
        .unwrap()
        .movie_ids;
    ids.sort();
    assert_eq!(ids, vec![m1, m3], "update must replace the relation set wholesale");

    // Deleting a genre removes its join rows and leaves other genres alone.
    let action = genre_service::create_genre(
        &state,
        &admin,
        CreateGenreRequest {
            name: "Action".into(),
            movie_ids: Some(vec![m1]),
        },
    )
    .await?
    .data
    .unwrap()
    .id;

    genre_service::delete_genre(&state, &admin, drama).await?;
    assert_eq!(
        MovieGenres::find()
            .filter(MovieGenreCol::GenreId.eq(drama))
            .count(&state.orm)
            .await?,
        0
    );
    assert_eq!(
        MovieGenres::find()
            .filter(MovieGenreCol::GenreId.eq(action))
            .count(&state.orm)
            .await?,
        1
    );

    // Related names render sorted, whatever order the ids were submitted in.
    let epic = genre_service::create_genre(
        &state,
        &admin,
        CreateGenreRequest {
            name: "Epic".into(),
            movie_ids: Some(vec![m3, m2]),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(epic.movie_ids, vec![m2, m3]);
    assert_eq!(epic.movie_names, "Dunkirk, Interstellar");

    // Fixed role ordering: name ascending, independent of insertion order.
    let _ops_role = create_role(&state, &admin, "ops").await?;
    let roles = role_service::list_roles(
        &state,
        &admin,
        Pagination {
            page: Some(1),
            per_page: Some(20),
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    let role_names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(role_names, vec!["admin", "ops", "user"]);

    // Fixed genre ordering: name descending.
    let genres = genre_service::list_genres(
        &state,
        Pagination {
            page: Some(1),
            per_page: Some(20),
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    let genre_names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(genre_names, vec!["Epic", "Comedy", "Action"]);

    // Fixed movie ordering: name ascending.
    let movies = movie_service::list_movies(
        &state,
        Pagination {
            page: Some(1),
            per_page: Some(20),
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    let movie_names: Vec<&str> = movies.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(movie_names, vec!["Dunkirk", "Inception", "Interstellar"]);

    // Fixed user ordering: active users first, then username ascending.
    create_user(&state, &admin, "ali", "ali123", true, user_role).await?;
    create_user(&state, &admin, "veli", "veli123", false, user_role).await?;
    let users = user_service::list_users(
        &state,
        Pagination {
            page: Some(1),
            per_page: Some(20),
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    let usernames: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(usernames, vec!["ali", "mehmet", "veli"]);

    // The stored password only ever leaves the service masked.
    let mehmet = users.iter().find(|u| u.username == "mehmet").unwrap();
    assert_eq!(mehmet.password_masked, "*******");
    assert_eq!(mehmet.role_name, "user");

    // Login: wrong password and inactive users are rejected; a valid login
    // yields a bearer token.
    let err = login(&state, "mehmet", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    let err = login(&state, "veli", "veli123").await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    let token = login(&state, "mehmet", "pass123").await?;
    assert!(token.starts_with("Bearer "));

    // Movie delete cascades its own join rows.
    movie_service::delete_movie(&state, &admin, m1).await?;
    assert_eq!(
        MovieGenres::find()
            .filter(MovieGenreCol::MovieId.eq(m1))
            .count(&state.orm)
            .await?,
        0
    );

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE movie_genres, movies, genres, directors, users, roles RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState { pool, orm })
}

async fn create_role(state: &AppState, admin: &AuthUser, name: &str) -> anyhow::Result<i32> {
    let resp = role_service::create_role(
        state,
        admin,
        CreateRoleRequest { name: name.into() },
    )
    .await?;
    Ok(resp.data.unwrap().id)
}

async fn create_user(
    state: &AppState,
    admin: &AuthUser,
    username: &str,
    password: &str,
    is_active: bool,
    role_id: i32,
) -> anyhow::Result<i32> {
    let resp = user_service::create_user(
        state,
        admin,
        CreateUserRequest {
            username: username.into(),
            password: password.into(),
            is_active,
            status: Status::Junior,
            role_id: Some(role_id),
        },
    )
    .await?;
    Ok(resp.data.unwrap().id)
}

async fn create_movie(
    state: &AppState,
    admin: &AuthUser,
    name: &str,
    director_id: i32,
) -> anyhow::Result<i32> {
    let resp = movie_service::create_movie(
        state,
        admin,
        CreateMovieRequest {
            name: name.into(),
            release_date: None,
            total_revenue: None,
            director_id,
            genre_ids: None,
        },
    )
    .await?;
    Ok(resp.data.unwrap().id)
}

async fn login(state: &AppState, username: &str, password: &str) -> Result<String, AppError> {
    let resp = auth_service::login_user(
        state,
        LoginRequest {
            username: username.into(),
            password: password.into(),
        },
    )
    .await?;
    Ok(resp.data.unwrap().token)
}
