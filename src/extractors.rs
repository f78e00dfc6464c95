use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::session::Session;
use crate::state::AppState;

/// Extractor that requires a stored session token.
/// Rejects with a redirect to the login page when there is none.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Session);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = state.session().get();
        if session.is_authenticated() {
            Ok(Authenticated(session))
        } else {
            Err(AppError::Unauthorized)
        }
    }
}
