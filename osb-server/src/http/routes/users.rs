//! User endpoints
//!
//! Listing and lookup only expose `{id, name}`; email and the stored hash
//! never leave the server.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};

use osb_core::User;

use super::{CreatedResponse, Empty};
use crate::db::Repository;
use crate::http::error::ApiError;
use crate::http::password::hash_password;
use crate::http::server::AppState;

/// Public view of a user
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
        }
    }
}

/// Registration form (`application/x-www-form-urlencoded`)
#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Full replacement of a user's profile
#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// GET /users
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let users = Repository::<User>::list_all(state.store()).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

/// GET /users/{id}
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = Repository::<User>::get(state.store(), id).await?;
    Ok(Json(PublicUser::from(user)))
}

/// POST /users/register
async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let user = User {
        id: 0,
        name: form.username,
        email: form.email,
        password_hash: hash_password(&form.password),
    };
    let id = Repository::<User>::add(state.store(), &user).await?;

    tracing::info!(id, name = %user.name, "registered user");
    Ok(Json(CreatedResponse { id }))
}

/// POST /users/delete/{id}
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Empty>, ApiError> {
    Repository::<User>::delete(state.store(), id).await?;
    Ok(Json(Empty {}))
}

/// POST /users/update/{id}
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<Empty>, ApiError> {
    let user = User {
        id,
        name: req.username,
        email: req.email,
        password_hash: hash_password(&req.password),
    };
    Repository::<User>::update(state.store(), &user).await?;
    Ok(Json(Empty {}))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/users/register", post(register))
        .route("/users/delete/{id}", post(delete_user))
        .route("/users/update/{id}", post(update_user))
}
