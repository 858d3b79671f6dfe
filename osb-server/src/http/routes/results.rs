//! Benchmark result endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use osb_core::{BenchmarkResult, Scores, Specs, SysInfo};

use super::Empty;
use crate::db::Repository;
use crate::http::error::ApiError;
use crate::http::extractors::BasicCredentials;
use crate::http::password::hash_password;
use crate::http::server::AppState;

/// A benchmark run uploaded by an authenticated user
#[derive(Deserialize)]
pub struct SubmitRequest {
    pub scores: Scores,
    #[serde(default)]
    pub specs: SysInfo,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub result_id: i64,
    pub specs_id: i64,
}

#[derive(Deserialize)]
pub struct UpdateResultRequest {
    pub user_id: i64,
    pub scores: Scores,
}

/// GET /results
async fn list_results(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BenchmarkResult>>, ApiError> {
    let results = Repository::<BenchmarkResult>::list_all(state.store()).await?;
    Ok(Json(results))
}

/// GET /results/user/{id}
async fn list_user_results(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<BenchmarkResult>>, ApiError> {
    let results = Repository::<BenchmarkResult>::list_by_owner(state.store(), user_id).await?;
    Ok(Json(results))
}

/// GET /results/{id}
async fn get_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<BenchmarkResult>, ApiError> {
    let result = Repository::<BenchmarkResult>::get(state.store(), id).await?;
    Ok(Json(result))
}

/// POST /results/submit
///
/// Stores the result, then the machine specs pointing at it. The two inserts
/// are independent; if the second fails the result row stays.
async fn submit_result(
    State(state): State<Arc<AppState>>,
    credentials: BasicCredentials,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let store = state.store();
    let user = store
        .get_by_credentials(&credentials.username, &hash_password(&credentials.password))
        .await
        .map_err(|e| {
            tracing::warn!(user = %credentials.username, error = %e, "rejected submission");
            ApiError::Forbidden {
                reason: "invalid credentials",
            }
        })?;

    let result = BenchmarkResult {
        id: 0,
        user_id: user.id,
        scores: req.scores,
    };
    let result_id = Repository::<BenchmarkResult>::add(store, &result).await?;

    let specs = Specs {
        id: 0,
        result_id,
        sys_info: req.specs,
    };
    let specs_id = Repository::<Specs>::add(store, &specs).await?;

    tracing::info!(user_id = user.id, result_id, specs_id, "stored submission");
    Ok(Json(SubmitResponse {
        result_id,
        specs_id,
    }))
}

/// POST /results/delete/{id}
async fn delete_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Empty>, ApiError> {
    Repository::<BenchmarkResult>::delete(state.store(), id).await?;
    Ok(Json(Empty {}))
}

/// POST /results/update/{id}
async fn update_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateResultRequest>,
) -> Result<Json<Empty>, ApiError> {
    let result = BenchmarkResult {
        id,
        user_id: req.user_id,
        scores: req.scores,
    };
    Repository::<BenchmarkResult>::update(state.store(), &result).await?;
    Ok(Json(Empty {}))
}

/// Result routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/results", get(list_results))
        .route("/results/user/{id}", get(list_user_results))
        .route("/results/{id}", get(get_result))
        .route("/results/submit", post(submit_result))
        .route("/results/delete/{id}", post(delete_result))
        .route("/results/update/{id}", post(update_result))
}
