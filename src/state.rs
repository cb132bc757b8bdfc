use crate::db::{DbPool, OrmConn};

/// Shared handles for the two database access paths: SeaORM for entity
/// queries and transactions, sqlx for migrations and raw parameterized SQL.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
}
