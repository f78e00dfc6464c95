use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::error::{error_message, ApiError};
use crate::config::ApiConfig;
use crate::session::SessionStore;

/// Whether a call is made on behalf of the logged-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Attach the bearer token when one exists; a 401 ends the session.
    Bearer,
    /// Never attach a token; a 401 is an ordinary failure (e.g. bad password).
    Public,
}

/// HTTP client for the CMS API, bound to a session store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionStore) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot carry paths: {}", config.base_url);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue an authenticated request to `path` (relative to the API base,
    /// may carry a query string) and decode the JSON response.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let url = self.path_url(path);
        let response = self.execute(method, url, body, Access::Bearer).await?;
        decode(response).await
    }

    pub(crate) async fn fetch_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
        access: Access,
    ) -> Result<T, ApiError> {
        let response = self.execute(method, url, body, access).await?;
        decode(response).await
    }

    /// For mutations whose response body carries nothing the caller needs.
    pub(crate) async fn fetch_unit(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        self.execute(method, url, body, Access::Bearer).await?;
        Ok(())
    }

    pub(crate) async fn fetch_bytes(&self, url: Url) -> Result<Vec<u8>, ApiError> {
        let response = self.execute(Method::GET, url, None, Access::Bearer).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn path_url(&self, path: &str) -> Url {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut url = self.url(&segments);
        url.set_query(query);
        url
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
        access: Access,
    ) -> Result<Response, ApiError> {
        let path = url.path().to_string();
        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, "application/json");

        if access == Access::Bearer {
            if let Some(token) = self.session.get().token {
                builder = builder.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        tracing::debug!("{} {}", method, path);
        let response = builder.send().await.map_err(|e| {
            tracing::warn!("{} {} unreachable: {}", method, path, e);
            ApiError::NetworkUnreachable(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && access == Access::Bearer {
            tracing::info!("{} {} rejected the session, logging out", method, path);
            if let Err(e) = self.session.clear() {
                tracing::error!("Failed to clear session: {}", e);
            }
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        tracing::warn!("{} {} failed with {}: {}", method, path, status, message);
        Err(ApiError::RequestFailed { status, message })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
}
