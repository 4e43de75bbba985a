//! Users listing endpoint.
//!
//! Serves a fixed placeholder record; there is no user store behind it.

use serde::Serialize;

use crate::response::ApiResponse;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl User {
    fn placeholder() -> Self {
        Self {
            id: 1,
            name: "Example User".to_string(),
            email: "user@example.com".to_string(),
        }
    }
}

pub async fn list() -> ApiResponse<Vec<User>> {
    ApiResponse::ok(vec![User::placeholder()])
}
