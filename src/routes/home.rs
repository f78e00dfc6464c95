use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::views::home::{self, HomeView};
use crate::views::NavTarget;

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub view: HomeView,
}

#[derive(Template)]
#[template(path = "pages/features.html")]
pub struct FeaturesTemplate {
    pub user_name: String,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

async fn index(State(state): State<AppState>) -> Response {
    Html(HomeTemplate {
        view: home::home(state.session()),
    })
    .into_response()
}

async fn features(State(state): State<AppState>) -> Response {
    match home::guarded(state.session(), NavTarget::Features) {
        NavTarget::Features => {
            let user_name = state
                .session()
                .get()
                .user_name
                .unwrap_or_else(|| "there".to_string());
            Html(FeaturesTemplate { user_name }).into_response()
        }
        other => Redirect::to(&other.path()).into_response(),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/features", get(features))
}
