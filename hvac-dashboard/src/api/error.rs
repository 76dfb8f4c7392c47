use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hvac_domain::DatasetError;
use serde::Serialize;

use crate::scenarios::ScenarioError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Dataset(DatasetError::EmptySelection) => StatusCode::NOT_FOUND,
            ApiError::Dataset(DatasetError::MissingColumn(_))
            | ApiError::Scenario(ScenarioError::Dataset(DatasetError::MissingColumn(_))) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Dataset(_) | ApiError::Scenario(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::Dataset(DatasetError::EmptySelection) => "EmptySelection",
            ApiError::Dataset(DatasetError::MissingColumn(_))
            | ApiError::Scenario(ScenarioError::Dataset(DatasetError::MissingColumn(_))) => "MissingColumn",
            ApiError::Scenario(ScenarioError::EmptyDataset) => "EmptyDataset",
            ApiError::Dataset(_) | ApiError::Scenario(_) => "InternalError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.error_type(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
