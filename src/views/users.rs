use serde::Deserialize;

use crate::api::models::{UserRecord, UserUpdate};
use crate::api::{ApiClient, ApiError};
use crate::session::Role;
use crate::views::page::{load_page, path_segment, run_action, NavTarget, PageOutcome, Settled};
use crate::views::region::Region;

/// Submitted user edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

/// Edit form prefilled from the API.
#[derive(Debug, Clone, PartialEq)]
pub struct UserEditView {
    pub id: String,
    pub user: Region<UserFields>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<UserRecord> for UserFields {
    fn from(user: UserRecord) -> Self {
        Self {
            name: user.name,
            email: user.email,
            is_admin: user.role == Role::Admin,
        }
    }
}

impl UserEditView {
    pub fn path(&self) -> String {
        format!("/admin/users/{}", path_segment(&self.id))
    }
}

impl Settled for UserEditView {
    fn session_expired(&self) -> bool {
        self.user.is_expired()
    }
}

pub async fn edit(api: &ApiClient, id: &str) -> PageOutcome<UserEditView> {
    load_page(api.session(), |_| async move {
        UserEditView {
            id: id.to_string(),
            user: Region::from(api.user(id).await).map(UserFields::from),
        }
    })
    .await
}

pub async fn update(api: &ApiClient, id: &str, form: &UserForm) -> Result<NavTarget, ApiError> {
    run_action(api.session(), || async move {
        let name = form.name.trim();
        let email = form.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(ApiError::ValidationFailed("Please fill in all fields".into()));
        }

        let update = UserUpdate {
            name: name.to_string(),
            email: email.to_string(),
            role: Role::parse(&form.role),
        };
        api.update_user(id, &update).await?;
        tracing::info!("User {} updated (role {})", id, update.role);
        Ok(NavTarget::AdminDashboard)
    })
    .await
}

pub async fn delete(api: &ApiClient, id: &str, confirmed: bool) -> Result<NavTarget, ApiError> {
    run_action(api.session(), || async move {
        if confirmed {
            api.delete_user(id).await?;
            tracing::info!("User {} deleted", id);
        }
        Ok(NavTarget::AdminDashboard)
    })
    .await
}
