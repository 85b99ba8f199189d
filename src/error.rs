use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Outcomes the store reports back to clients as `"status": "error"` bodies.
/// These still go out with HTTP 200.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("No pipes selected")]
    NoPipesSelected,
    #[error("No landmarks available")]
    NoLandmarks,
    #[error("No saved map found for this user")]
    MapNotFound,
    #[error("No display data available")]
    NoDisplayData,
}

/// Request rejected before it reaches a handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidBody(String),
}

#[derive(Serialize)]
struct ErrorDetail {
    detail: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorDetail {
            detail: self.to_string(),
        })
    }
}
