use crate::api::ApiError;

/// Independently settled result of one load, rendered into its own part of
/// a page. A failed region never takes its neighbours down with it.
#[derive(Debug, Clone, PartialEq)]
pub enum Region<T> {
    Loaded(T),
    Failed(ApiError),
}

impl<T> Region<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Region::Loaded(value) => Some(value),
            Region::Failed(_) => None,
        }
    }

    /// Dialog text for a failed region.
    pub fn error(&self) -> Option<String> {
        match self {
            Region::Loaded(_) => None,
            Region::Failed(e) => Some(e.user_message()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Region::Loaded(_))
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Region::Failed(e) if e.is_unauthorized())
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Region<U> {
        match self {
            Region::Loaded(value) => Region::Loaded(f(value)),
            Region::Failed(e) => Region::Failed(e),
        }
    }
}

impl<T> From<Result<T, ApiError>> for Region<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Region::Loaded(value),
            Err(e) => {
                if !e.is_unauthorized() {
                    tracing::warn!("Region failed to load: {}", e);
                }
                Region::Failed(e)
            }
        }
    }
}
