pub mod admin;
pub mod auth;
pub mod home;

use askama::Template;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Router;

use crate::api::ApiError;
use crate::error::AppError;
use crate::state::AppState;
use crate::views::{NavTarget, PageOutcome};
use home::Html;

/// All console routes. Layers are added by the caller.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(home::router())
        .merge(auth::router())
        .merge(admin::router())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

pub(crate) fn redirect(target: &NavTarget) -> Response {
    Redirect::to(&target.path()).into_response()
}

/// Render a settled page, or follow its redirect.
pub(crate) fn render_page<V, T, F>(outcome: PageOutcome<V>, template: F) -> Response
where
    T: Template,
    F: FnOnce(V) -> T,
{
    match outcome {
        PageOutcome::Render(view) => Html(template(view)).into_response(),
        PageOutcome::Redirect(target) => redirect(&target),
    }
}

/// Status for a form that is shown again with an error message.
pub(crate) fn form_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
        ApiError::RequestFailed { status, .. } if status.is_client_error() => *status,
        ApiError::SessionStorage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Render `template` with a non-200 status.
pub(crate) fn with_status<T: Template>(status: StatusCode, template: T) -> Response {
    let mut response = Html(template).into_response();
    if response.status().is_success() {
        *response.status_mut() = status;
    }
    response
}
