use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::error::Error;

/// Error returned by a handler, rendered as `{"detail": ...}`
#[derive(Debug)]
pub enum ApiError {
    /// 503
    NotReady(String),
    /// 404
    NotFound(String),
    /// 422
    Validation(String),
    /// 500, detail is never shown to the client
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::ModelNotReady(_) => {
                ApiError::NotReady("Model is not ready. Run the build command first.".into())
            }
            Error::ArticleNotFound { idx, .. } => ApiError::NotFound(format!("Article {idx} not found")),
            Error::InvalidNeighborCount { .. } => ApiError::Validation(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::Internal(msg) => {
                error!(error = %msg, "request failed");
                "Internal server error".to_string()
            }
            ApiError::NotReady(msg) | ApiError::NotFound(msg) | ApiError::Validation(msg) => msg,
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (Error::ModelNotReady("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (Error::ArticleNotFound { idx: 5, len: 3 }, StatusCode::NOT_FOUND),
            (Error::InvalidNeighborCount { k: 0 }, StatusCode::UNPROCESSABLE_ENTITY),
            (Error::EmptyVocabulary { docs: 0 }, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
