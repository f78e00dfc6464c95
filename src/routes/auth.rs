use askama::Template;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use crate::api::ApiError;
use crate::error::AppResult;
use crate::routes::home::Html;
use crate::routes::{form_status, redirect, with_status};
use crate::state::AppState;
use crate::views::auth::{self, LoginForm, LoginOutcome, LogoutScope, RegisterForm, RegisterOutcome};

#[derive(Template)]
#[template(path = "pages/login.html")]
struct LoginTemplate {
    admin_only: bool,
    email: String,
    error: Option<String>,
    notice: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/register.html")]
struct RegisterTemplate {
    name: String,
    email: String,
    error: Option<String>,
}

#[derive(Deserialize, Default)]
struct LoginQuery {
    #[serde(default)]
    admin: bool,
    #[serde(default)]
    registered: bool,
}

async fn login_page(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    let notice = query
        .registered
        .then(|| "Registration successful! Please log in.".to_string());
    Html(LoginTemplate {
        admin_only: query.admin,
        email: String::new(),
        error: None,
        notice,
    })
}

async fn login_submit(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let page = |error: String| LoginTemplate {
        admin_only: query.admin,
        email: form.email.clone(),
        error: Some(error),
        notice: None,
    };

    match auth::login(&state.api, &form, query.admin).await {
        Ok(LoginOutcome::Welcome { name, target }) => {
            tracing::info!(
                "Logged in as {}",
                name.as_deref().unwrap_or("unnamed user")
            );
            Ok(redirect(&target))
        }
        Ok(LoginOutcome::AccessDenied) => Ok(with_status(
            StatusCode::FORBIDDEN,
            page("Access Denied: this login is for administrators only.".to_string()),
        )),
        Err(e @ ApiError::SessionStorage(_)) => Err(e.into()),
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            Ok(with_status(form_status(&e), page(e.user_message())))
        }
    }
}

async fn register_page() -> impl IntoResponse {
    Html(RegisterTemplate {
        name: String::new(),
        email: String::new(),
        error: None,
    })
}

async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let page = |error: String| RegisterTemplate {
        name: form.name.clone(),
        email: form.email.clone(),
        error: Some(error),
    };

    match auth::register(&state.api, &form).await {
        Ok(RegisterOutcome::Registered) => {
            tracing::info!("Registered account for {}", form.email.trim());
            Redirect::to("/login?registered=true").into_response()
        }
        Ok(RegisterOutcome::Rejected(message)) => {
            with_status(StatusCode::BAD_REQUEST, page(message))
        }
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            with_status(form_status(&e), page(e.user_message()))
        }
    }
}

async fn logout(State(state): State<AppState>) -> Response {
    redirect(&auth::logout(state.session(), LogoutScope::Site))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/register", get(register_page).post(register_submit))
        .route("/logout", post(logout))
}
