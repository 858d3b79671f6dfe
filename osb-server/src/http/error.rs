//! API error types with IntoResponse
//!
//! Every repository failure, not-found included, becomes a generic 500.
//! Only rejected basic-auth credentials get their own status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;

/// API error type with HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Repository failure (500, logged)
    Database(DbError),

    /// Missing or rejected credentials (403)
    Forbidden { reason: &'static str },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!(error = %e, "database error");
                json!({
                    "error": "internal_error",
                    "message": "an internal error occurred"
                })
            }
            Self::Forbidden { reason } => json!({
                "error": "forbidden",
                "message": reason
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        Self::Database(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn not_found_is_still_500() {
        let err = ApiError::from(DbError::NotFound {
            resource: "result",
            id: "9".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "internal_error");
    }

    #[tokio::test]
    async fn forbidden_is_403() {
        let err = ApiError::Forbidden {
            reason: "invalid credentials",
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
