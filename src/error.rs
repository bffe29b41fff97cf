// Custom error types and conversions.
// Every failure inside the request pipeline is converted into a JSON error
// body here; nothing propagates as an unhandled fault.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The remote dataset could not be fetched or parsed.
    #[error("{0:#}")]
    Load(anyhow::Error),
    /// The filter chain matched zero rows.
    #[error("No data found for the specified filters.")]
    EmptyResult,
    /// Anything unanticipated, e.g. a filter naming a column the dataset lacks.
    #[error("{0:#}")]
    Internal(anyhow::Error),
}

// Convert errors into HTTP responses with an {"error": ...} body
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Load(e) => {
                tracing::error!("Dataset load failed: {:?}", e);
                StatusCode::BAD_GATEWAY
            }
            AppError::EmptyResult => StatusCode::NOT_FOUND,
            AppError::Internal(e) => {
                tracing::error!("Request failed: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

// Define a custom Result type using our AppError
pub type AppResult<T> = Result<T, AppError>;
