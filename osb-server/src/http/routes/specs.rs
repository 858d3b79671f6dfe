//! Machine specs endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use osb_core::{Specs, SysInfo};

use super::{CreatedResponse, Empty};
use crate::db::Repository;
use crate::http::error::ApiError;
use crate::http::server::AppState;

#[derive(Deserialize)]
pub struct AddSpecsRequest {
    #[serde(default)]
    pub specs: SysInfo,
}

#[derive(Deserialize)]
pub struct UpdateSpecsRequest {
    pub result_id: i64,
    #[serde(default)]
    pub specs: SysInfo,
}

/// GET /specs
async fn list_specs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Specs>>, ApiError> {
    let specs = Repository::<Specs>::list_all(state.store()).await?;
    Ok(Json(specs))
}

/// GET /specs/result/{id}
async fn list_result_specs(
    State(state): State<Arc<AppState>>,
    Path(result_id): Path<i64>,
) -> Result<Json<Vec<Specs>>, ApiError> {
    let specs = Repository::<Specs>::list_by_owner(state.store(), result_id).await?;
    Ok(Json(specs))
}

/// GET /specs/{id}
async fn get_specs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Specs>, ApiError> {
    let specs = Repository::<Specs>::get(state.store(), id).await?;
    Ok(Json(specs))
}

/// POST /specs/add/result/{id}
async fn add_specs(
    State(state): State<Arc<AppState>>,
    Path(result_id): Path<i64>,
    Json(req): Json<AddSpecsRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let specs = Specs {
        id: 0,
        result_id,
        sys_info: req.specs,
    };
    let id = Repository::<Specs>::add(state.store(), &specs).await?;
    Ok(Json(CreatedResponse { id }))
}

/// POST /specs/delete/{id}
async fn delete_specs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Empty>, ApiError> {
    Repository::<Specs>::delete(state.store(), id).await?;
    Ok(Json(Empty {}))
}

/// POST /specs/update/{id}
async fn update_specs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSpecsRequest>,
) -> Result<Json<Empty>, ApiError> {
    let specs = Specs {
        id,
        result_id: req.result_id,
        sys_info: req.specs,
    };
    Repository::<Specs>::update(state.store(), &specs).await?;
    Ok(Json(Empty {}))
}

/// Specs routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/specs", get(list_specs))
        .route("/specs/result/{id}", get(list_result_specs))
        .route("/specs/{id}", get(get_specs))
        .route("/specs/add/result/{id}", post(add_specs))
        .route("/specs/delete/{id}", post(delete_specs))
        .route("/specs/update/{id}", post(update_specs))
}
