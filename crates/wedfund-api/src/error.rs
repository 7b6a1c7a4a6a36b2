use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use wedfund_stats::StatsError;
use wedfund_store::StoreError;
use wedfund_types::api::ErrorBody;
use wedfund_types::form::{FieldErrors, FormError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error("validation failed")]
    ValidationFailed(FieldErrors),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("{0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<FormError> for ApiError {
    fn from(e: FormError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Store(StoreError::NotFound { .. }) | Self::Stats(_) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::AlreadyExists { .. } | StoreError::Conflict(_))
            | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(StoreError::Backend(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = match self {
            Self::ValidationFailed(fields) => ErrorBody {
                error: "validation failed".into(),
                fields: Some(fields.into_map()),
            },
            // Internal details stay in the log.
            Self::Internal(_) | Self::Store(StoreError::Backend(_)) => ErrorBody {
                error: "internal error".into(),
                fields: None,
            },
            other => ErrorBody {
                error: other.to_string(),
                fields: None,
            },
        };

        (status, Json(body)).into_response()
    }
}
