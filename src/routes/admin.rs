use askama::Template;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use crate::api::models::MessageStatus;
use crate::api::ApiError;
use crate::error::AppResult;
use crate::export::{self, CsvExport};
use crate::extractors::Authenticated;
use crate::routes::{form_status, redirect, render_page, with_status};
use crate::state::AppState;
use crate::views::admin::{self as dashboard, AdminDashboard};
use crate::views::auth::{self, LogoutScope};
use crate::views::messages::{self, MessageDetail, MessageFilter, MessageList, ReturnTo};
use crate::views::users::{self, UserEditView, UserFields, UserForm};
use crate::views::Region;

#[derive(Template)]
#[template(path = "pages/admin_dashboard.html")]
struct DashboardTemplate {
    view: AdminDashboard,
}

#[derive(Template)]
#[template(path = "pages/messages.html")]
struct MessagesTemplate {
    view: MessageList,
    back: &'static str,
}

#[derive(Template)]
#[template(path = "pages/message_detail.html")]
struct MessageDetailTemplate {
    view: MessageDetail,
}

#[derive(Template)]
#[template(path = "pages/user_edit.html")]
struct UserEditTemplate {
    view: UserEditView,
    error: Option<String>,
}

#[derive(Deserialize)]
struct StatusForm {
    status: MessageStatus,
    #[serde(default)]
    back: ReturnTo,
}

#[derive(Deserialize)]
struct DeleteForm {
    #[serde(default)]
    confirm: Option<String>,
    #[serde(default)]
    back: ReturnTo,
}

impl DeleteForm {
    fn confirmed(&self) -> bool {
        self.confirm.as_deref().is_some_and(|v| !v.is_empty())
    }
}

// -- Pages --

async fn dashboard_page(State(state): State<AppState>) -> Response {
    let outcome = dashboard::dashboard(&state.api).await;
    render_page(outcome, |view| DashboardTemplate { view })
}

async fn all_messages(State(state): State<AppState>) -> Response {
    let outcome = messages::list(&state.api, MessageFilter::All).await;
    render_page(outcome, |view| MessagesTemplate { view, back: "all" })
}

async fn new_messages(State(state): State<AppState>) -> Response {
    let outcome = messages::list(&state.api, MessageFilter::New).await;
    render_page(outcome, |view| MessagesTemplate { view, back: "new" })
}

async fn message_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let outcome = messages::detail(&state.api, &id).await;
    render_page(outcome, |view| MessageDetailTemplate { view })
}

async fn user_edit_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let outcome = users::edit(&state.api, &id).await;
    render_page(outcome, |view| UserEditTemplate { view, error: None })
}

// -- Actions --

async fn message_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> AppResult<Response> {
    let target = messages::set_status(&state.api, &id, form.status, form.back).await?;
    Ok(redirect(&target))
}

async fn message_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> AppResult<Response> {
    let target = messages::delete(&state.api, &id, form.confirmed(), form.back).await?;
    Ok(redirect(&target))
}

async fn user_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<UserForm>,
) -> AppResult<Response> {
    match users::update(&state.api, &id, &form).await {
        Ok(target) => Ok(redirect(&target)),
        Err(e @ ApiError::ValidationFailed(_)) => {
            // Show the form again with what was submitted
            let view = UserEditView {
                id,
                user: Region::Loaded(UserFields {
                    name: form.name.clone(),
                    email: form.email.clone(),
                    is_admin: form.role == "admin",
                }),
            };
            Ok(with_status(
                form_status(&e),
                UserEditTemplate {
                    view,
                    error: Some(e.user_message()),
                },
            ))
        }
        Err(e) => Err(e.into()),
    }
}

async fn user_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> AppResult<Response> {
    let target = users::delete(&state.api, &id, form.confirmed()).await?;
    Ok(redirect(&target))
}

async fn logout(State(state): State<AppState>) -> Response {
    redirect(&auth::logout(state.session(), LogoutScope::Console))
}

// -- Exports --

/// CSV built here from the messages list.
async fn export_messages(
    State(state): State<AppState>,
    _auth: Authenticated,
) -> AppResult<Response> {
    let listing = state.api.contacts().await?;
    let csv = export::export_messages(&listing.data, today())?;
    tracing::info!("Exported {} messages", listing.data.len());
    Ok(attachment(csv))
}

/// CSV produced by the API, passed through unchanged.
async fn export_contacts(
    State(state): State<AppState>,
    _auth: Authenticated,
) -> AppResult<Response> {
    let content = state.api.export_contacts().await?;
    Ok(attachment(CsvExport {
        filename: export::export_file_name("contacts", today()),
        content,
    }))
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn attachment(csv: CsvExport) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", csv.filename);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv.content,
    )
        .into_response()
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard_page))
        .route("/admin/logout", post(logout))
        .route("/admin/messages", get(all_messages))
        .route("/admin/messages/new", get(new_messages))
        .route("/admin/messages/export", get(export_messages))
        .route("/admin/messages/{id}", get(message_page))
        .route("/admin/messages/{id}/status", post(message_status))
        .route("/admin/messages/{id}/delete", post(message_delete))
        .route("/admin/contacts/export", get(export_contacts))
        .route("/admin/users/{id}/edit", get(user_edit_page).post(user_update))
        .route("/admin/users/{id}/delete", post(user_delete))
}
