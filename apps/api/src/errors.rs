use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned whenever the resume or the job description resolves to empty text.
pub const MISSING_INPUT_MESSAGE: &str = "'resume' and 'job_description' are required.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("'resume' and 'job_description' are required.")]
    MissingInput,

    /// Provider failure. The message is passed through to the caller verbatim.
    #[error("{0}")]
    Llm(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingInput => StatusCode::BAD_REQUEST,
            AppError::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The text shown to the caller, in either the JSON or the HTML rendering.
    pub fn public_message(&self) -> String {
        match self {
            AppError::MissingInput => MISSING_INPUT_MESSAGE.to_string(),
            AppError::Llm(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.public_message() }));

        (status, body).into_response()
    }
}
