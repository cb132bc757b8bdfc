use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::DirectorView;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDirectorRequest {
    pub name: String,
    pub surname: String,
    pub is_retired: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDirectorRequest {
    pub name: String,
    pub surname: String,
    pub is_retired: bool,
}

#[derive(Serialize, ToSchema)]
pub struct DirectorList {
    pub items: Vec<DirectorView>,
}
