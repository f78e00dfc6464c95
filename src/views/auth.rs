use serde::Deserialize;

use crate::api::models::{Credentials, Registration};
use crate::api::{ApiClient, ApiError};
use crate::session::{Role, SessionStore};
use crate::views::page::NavTarget;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Session stored; continue to `target`.
    Welcome {
        name: Option<String>,
        target: NavTarget,
    },
    /// The admin-only login was used by a non-admin account. Nothing is
    /// left in the session.
    AccessDenied,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    Registered,
    Rejected(String),
}

/// Where a logout was triggered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutScope {
    /// Public site: drop the session keys and go home.
    Site,
    /// Admin console: wipe storage and go back to login.
    Console,
}

fn required(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub async fn login(
    api: &ApiClient,
    form: &LoginForm,
    admin_only: bool,
) -> Result<LoginOutcome, ApiError> {
    let Some(email) = required(&form.email).filter(|_| !form.password.is_empty()) else {
        return Err(ApiError::ValidationFailed(
            "Please enter your email and password".into(),
        ));
    };
    let password = form.password.clone();

    tracing::info!("Attempting login for {} (admin only: {})", email, admin_only);
    let response = api.login(&Credentials { email, password }).await?;

    let token = match (&response.success, &response.token) {
        (true, Some(token)) if !token.is_empty() => token.clone(),
        _ => {
            return Err(ApiError::InvalidResponse(
                response
                    .error
                    .clone()
                    .unwrap_or_else(|| "missing token".to_string()),
            ))
        }
    };

    let store = api.session();
    let Some(name) = response.user_name().map(str::to_string) else {
        tracing::warn!("Login response carried no user data");
        // Nothing of a previous account may outlive this login
        store
            .clear()
            .and_then(|_| store.set_token(&token))
            .map_err(|e| ApiError::SessionStorage(e.to_string()))?;
        return Ok(LoginOutcome::Welcome {
            name: None,
            target: NavTarget::Home,
        });
    };

    let role = response.user_role();
    store
        .set(&token, &name, role)
        .map_err(|e| ApiError::SessionStorage(e.to_string()))?;
    if let Some(profile) = &response.data {
        if let Err(e) = store.set_profile(profile) {
            tracing::warn!("Could not store user profile: {}", e);
        }
    }

    if admin_only && role != Role::Admin {
        tracing::warn!("Non-admin {} tried the admin login", name);
        if let Err(e) = store.clear() {
            tracing::error!("Failed to clear session: {}", e);
        }
        return Ok(LoginOutcome::AccessDenied);
    }

    let target = match role {
        Role::Admin => NavTarget::AdminDashboard,
        Role::User => NavTarget::Home,
    };
    Ok(LoginOutcome::Welcome {
        name: Some(name),
        target,
    })
}

pub async fn register(api: &ApiClient, form: &RegisterForm) -> Result<RegisterOutcome, ApiError> {
    let (Some(name), Some(email)) = (required(&form.name), required(&form.email)) else {
        return Err(ApiError::ValidationFailed("Please fill in all fields".into()));
    };
    if form.password.is_empty() {
        return Err(ApiError::ValidationFailed("Please fill in all fields".into()));
    }

    api.ping().await.map_err(|e| {
        tracing::warn!("Backend connection test failed: {}", e);
        ApiError::NetworkUnreachable(
            "Unable to connect to the server. Please try again later.".into(),
        )
    })?;

    let response = api
        .register(&Registration {
            name,
            email,
            password: form.password.clone(),
        })
        .await?;

    if response.success {
        Ok(RegisterOutcome::Registered)
    } else {
        Ok(RegisterOutcome::Rejected(
            response
                .error
                .unwrap_or_else(|| "Registration failed".to_string()),
        ))
    }
}

pub fn logout(store: &SessionStore, scope: LogoutScope) -> NavTarget {
    let result = match scope {
        LogoutScope::Site => store.end(),
        LogoutScope::Console => store.clear(),
    };
    if let Err(e) = result {
        tracing::error!("Failed to clear session on logout: {}", e);
    }

    match scope {
        LogoutScope::Site => NavTarget::Home,
        LogoutScope::Console => NavTarget::Login,
    }
}
