use axum_movie_catalog_api::{config::AppConfig, db::create_pool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_role_id = ensure_role(&pool, "admin").await?;
    let user_role_id = ensure_role(&pool, "user").await?;

    ensure_user(&pool, "admin", "admin123", true, 2, admin_role_id).await?;
    ensure_user(&pool, "leo", "leo123", true, 1, user_role_id).await?;

    let nolan = ensure_director(&pool, "Christopher", "Nolan", false).await?;
    let scott = ensure_director(&pool, "Ridley", "Scott", false).await?;

    let inception = ensure_movie(&pool, "Inception", "2010-07-16", 836.8, nolan).await?;
    let martian = ensure_movie(&pool, "The Martian", "2015-10-02", 630.6, scott).await?;

    let scifi = ensure_genre(&pool, "Science Fiction").await?;
    let thriller = ensure_genre(&pool, "Thriller").await?;

    link_movie_genre(&pool, inception, scifi).await?;
    link_movie_genre(&pool, inception, thriller).await?;
    link_movie_genre(&pool, martian, scifi).await?;

    println!("Seed completed.");
    Ok(())
}

async fn ensure_role(pool: &sqlx::PgPool, name: &str) -> anyhow::Result<i32> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM roles WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = row {
        return Ok(id);
    }
    let (id,): (i32,) = sqlx::query_as("INSERT INTO roles (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    username: &str,
    password: &str,
    is_active: bool,
    status: i32,
    role_id: i32,
) -> anyhow::Result<i32> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = row {
        return Ok(id);
    }
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO users (username, password, is_active, status, role_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(password)
    .bind(is_active)
    .bind(status)
    .bind(role_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn ensure_director(
    pool: &sqlx::PgPool,
    name: &str,
    surname: &str,
    is_retired: bool,
) -> anyhow::Result<i32> {
    let row: Option<(i32,)> =
        sqlx::query_as("SELECT id FROM directors WHERE name = $1 AND surname = $2")
            .bind(name)
            .bind(surname)
            .fetch_optional(pool)
            .await?;
    if let Some((id,)) = row {
        return Ok(id);
    }
    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO directors (name, surname, is_retired) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(surname)
    .bind(is_retired)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn ensure_movie(
    pool: &sqlx::PgPool,
    name: &str,
    release_date: &str,
    total_revenue: f64,
    director_id: i32,
) -> anyhow::Result<i32> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM movies WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = row {
        return Ok(id);
    }
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO movies (name, release_date, total_revenue, director_id)
        VALUES ($1, $2::date, $3, $4)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(release_date)
    .bind(total_revenue)
    .bind(director_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn ensure_genre(pool: &sqlx::PgPool, name: &str) -> anyhow::Result<i32> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM genres WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = row {
        return Ok(id);
    }
    let (id,): (i32,) = sqlx::query_as("INSERT INTO genres (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn link_movie_genre(pool: &sqlx::PgPool, movie_id: i32, genre_id: i32) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO movie_genres (movie_id, genre_id)
        VALUES ($1, $2)
        ON CONFLICT (movie_id, genre_id) DO NOTHING
        "#,
    )
    .bind(movie_id)
    .bind(genre_id)
    .execute(pool)
    .await?;
    Ok(())
}
