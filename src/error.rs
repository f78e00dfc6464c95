use askama::Template;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};

use crate::api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    /// No session, or the API dropped it. Sends the browser to the login page.
    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Export error: {0}")]
    Export(#[from] csv::Error),
}

#[derive(Template)]
#[template(path = "pages/error.html")]
struct ErrorTemplate {
    status: u16,
    title: String,
    message: String,
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Page not found".to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Please log in".to_string()),
            AppError::Api(e) => match e {
                ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, e.user_message()),
                ApiError::ValidationFailed(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                ApiError::RequestFailed { status, message } => (*status, message.clone()),
                ApiError::NetworkUnreachable(_) | ApiError::InvalidResponse(_) => {
                    tracing::warn!("Upstream API error: {}", e);
                    (StatusCode::BAD_GATEWAY, e.user_message())
                }
                ApiError::SessionStorage(_) => {
                    tracing::error!("{}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            AppError::Export(e) => {
                tracing::error!("Export error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Export failed".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status == StatusCode::UNAUTHORIZED {
            return Redirect::to("/login").into_response();
        }

        let page = ErrorTemplate {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            message: message.clone(),
        };
        match page.render() {
            Ok(body) => (
                status,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (status, message).into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
