// Page lifecycle - pure state transitions, no I/O
use std::fmt;
use std::future::Future;

use url::form_urlencoded;

use crate::api::ApiError;
use crate::session::{Session, SessionStore};

/// Places a controller can send the user to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    Home,
    Login,
    AdminLogin,
    Register,
    Features,
    AdminDashboard,
    Messages,
    NewMessages,
    Message(String),
}

impl NavTarget {
    pub fn path(&self) -> String {
        match self {
            NavTarget::Home => "/".to_string(),
            NavTarget::Login => "/login".to_string(),
            NavTarget::AdminLogin => "/login?admin=true".to_string(),
            NavTarget::Register => "/register".to_string(),
            NavTarget::Features => "/features".to_string(),
            NavTarget::AdminDashboard => "/admin".to_string(),
            NavTarget::Messages => "/admin/messages".to_string(),
            NavTarget::NewMessages => "/admin/messages/new".to_string(),
            NavTarget::Message(id) => format!("/admin/messages/{}", path_segment(id)),
        }
    }
}

/// Percent-encode a record id for use as one path segment.
pub fn path_segment(raw: &str) -> String {
    // byte_serialize escapes a literal '+', so every '+' left is a space
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

impl fmt::Display for NavTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Lifecycle of one guarded page load.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    /// Nothing read yet
    Init,

    /// No session; the page never loads
    Redirect { target: NavTarget },

    /// Session present, loads may be issued
    Authorized { session: Session },

    /// Loads settled and the page can be shown
    Rendered,

    /// The API rejected the token during a load or an action
    SessionExpired,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PageError {
    #[error("{0}")]
    InvalidTransition(String),
}

impl PageState {
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::Redirect { .. } => "Redirect",
            Self::Authorized { .. } => "Authorized",
            Self::Rendered => "Rendered",
            Self::SessionExpired => "SessionExpired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Redirect { .. } | Self::SessionExpired)
    }

    /// Transition: Init → Authorized | Redirect(login)
    pub fn guard(self, session: Session) -> Result<Self, PageError> {
        match self {
            Self::Init if session.is_authenticated() => Ok(Self::Authorized { session }),
            Self::Init => Ok(Self::Redirect {
                target: NavTarget::Login,
            }),
            other => Err(PageError::InvalidTransition(format!(
                "Cannot guard page from {} state",
                other.state_name()
            ))),
        }
    }

    /// Transition: Authorized → Rendered | SessionExpired
    pub fn settle(self, session_expired: bool) -> Result<Self, PageError> {
        match self {
            Self::Authorized { .. } if session_expired => Ok(Self::SessionExpired),
            Self::Authorized { .. } => Ok(Self::Rendered),
            other => Err(PageError::InvalidTransition(format!(
                "Cannot settle page from {} state",
                other.state_name()
            ))),
        }
    }

    /// Transition: Authorized | Rendered → SessionExpired
    pub fn expire(self) -> Result<Self, PageError> {
        match self {
            Self::Authorized { .. } | Self::Rendered | Self::SessionExpired => {
                Ok(Self::SessionExpired)
            }
            other => Err(PageError::InvalidTransition(format!(
                "Cannot expire page from {} state",
                other.state_name()
            ))),
        }
    }
}

/// What a page controller hands back to the HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome<T> {
    Render(T),
    Redirect(NavTarget),
}

impl<T> PageOutcome<T> {
    pub fn redirect_target(&self) -> Option<&NavTarget> {
        match self {
            PageOutcome::Redirect(target) => Some(target),
            PageOutcome::Render(_) => None,
        }
    }

    pub fn into_view(self) -> Option<T> {
        match self {
            PageOutcome::Render(view) => Some(view),
            PageOutcome::Redirect(_) => None,
        }
    }
}

/// A loaded page that knows whether any of its loads hit an expired session.
pub trait Settled {
    fn session_expired(&self) -> bool;
}

/// Run a guarded page load: check the session, run `load`, and collapse any
/// number of expired-session regions into a single redirect to login.
pub async fn load_page<T, F, Fut>(store: &SessionStore, load: F) -> PageOutcome<T>
where
    T: Settled,
    F: FnOnce(Session) -> Fut,
    Fut: Future<Output = T>,
{
    let session = match PageState::Init.guard(store.get()) {
        Ok(PageState::Authorized { session }) => session,
        Ok(PageState::Redirect { target }) => return PageOutcome::Redirect(target),
        Ok(other) => {
            tracing::error!("Unexpected {} state after guard", other.state_name());
            return PageOutcome::Redirect(NavTarget::Login);
        }
        Err(e) => {
            tracing::error!("Page guard failed: {}", e);
            return PageOutcome::Redirect(NavTarget::Login);
        }
    };

    let state = PageState::Authorized {
        session: session.clone(),
    };
    let view = load(session).await;

    match state.settle(view.session_expired()) {
        Ok(PageState::Rendered) => PageOutcome::Render(view),
        Ok(_) => {
            tracing::info!("Session expired while loading page");
            PageOutcome::Redirect(NavTarget::Login)
        }
        Err(e) => {
            tracing::error!("Page settle failed: {}", e);
            PageOutcome::Redirect(NavTarget::Login)
        }
    }
}

/// Run a state-changing action under the page lifecycle. Without a session
/// the action never runs, and a rejected token ends it as expired.
pub async fn run_action<F, Fut>(store: &SessionStore, action: F) -> Result<NavTarget, ApiError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<NavTarget, ApiError>>,
{
    let state = PageState::Init.guard(store.get()).map_err(|e| {
        tracing::error!("Action guard failed: {}", e);
        ApiError::Unauthorized
    })?;
    if state.is_terminal() {
        return Err(ApiError::Unauthorized);
    }

    match action().await {
        Err(ApiError::Unauthorized) => {
            match state.expire() {
                Ok(_) => tracing::info!("Session expired during action"),
                Err(e) => tracing::error!("Action expire failed: {}", e),
            }
            Err(ApiError::Unauthorized)
        }
        other => other,
    }
}
