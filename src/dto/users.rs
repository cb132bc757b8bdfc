use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{entity::users::Status, models::UserView};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub is_active: bool,
    pub status: Status,
    pub role_id: Option<i32>,
}

/// Updates replace every mutable field; there is no partial patch.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: String,
    pub password: String,
    pub is_active: bool,
    pub status: Status,
    pub role_id: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<UserView>,
}
