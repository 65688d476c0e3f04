use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use driftfolio_core::analysis::AnalysisError;
use driftfolio_core::errors::Error as CoreError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Not Found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// JSON body of every error response.
#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Core(e) => match e {
                CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                CoreError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                CoreError::Auth(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
                CoreError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
                CoreError::ConstraintViolation(_) => (StatusCode::CONFLICT, "constraint_violation"),
                CoreError::Analysis(AnalysisError::InvalidInvestment(_)) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "invalid_investment")
                }
                CoreError::ServiceUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            },
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Internal(_) | ApiError::Anyhow(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(code, "{}", self);
        }
        let body = Json(ErrorBody {
            code: code.to_string(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
