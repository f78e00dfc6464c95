use reqwest::StatusCode;

/// Failure of a call against the CMS API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The API rejected the bearer token. The local session is already gone
    /// by the time a caller sees this.
    #[error("Session expired, please log in again")]
    Unauthorized,

    #[error("Request failed ({status}): {message}")]
    RequestFailed { status: StatusCode, message: String },

    #[error("Unable to connect to the server: {0}")]
    NetworkUnreachable(String),

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    ValidationFailed(String),

    #[error("Could not save session: {0}")]
    SessionStorage(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text suitable for an error dialog.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::RequestFailed { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Pull a human readable message out of an error response body.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let field = json
            .get("error")
            .or_else(|| json.get("message"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty());
        if let Some(message) = field {
            return message.to_string();
        }
    }

    let text = body.trim();
    if !text.is_empty() && !text.starts_with('{') {
        return text.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}
