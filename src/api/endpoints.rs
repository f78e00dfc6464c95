use reqwest::Method;
use serde_json::json;
use url::Url;

use crate::api::client::{Access, ApiClient};
use crate::api::error::ApiError;
use crate::api::models::*;

fn with_limit(mut url: Url, limit: Option<u32>) -> Url {
    if let Some(limit) = limit {
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
    }
    url
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::ValidationFailed(e.to_string()))
}

impl ApiClient {
    // -- Auth --

    /// Connectivity check (`GET /test`).
    pub async fn ping(&self) -> Result<(), ApiError> {
        self.fetch_json::<serde_json::Value>(Method::GET, self.url(&["test"]), None, Access::Public)
            .await
            .map(|_| ())
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let body = to_body(credentials)?;
        self.fetch_json(
            Method::POST,
            self.url(&["auth", "login"]),
            Some(body),
            Access::Public,
        )
        .await
    }

    pub async fn register(&self, registration: &Registration) -> Result<RegisterResponse, ApiError> {
        let body = to_body(registration)?;
        self.fetch_json(
            Method::POST,
            self.url(&["auth", "register"]),
            Some(body),
            Access::Public,
        )
        .await
    }

    // -- Content --

    pub async fn projects(&self, limit: Option<u32>) -> Result<Listing<Project>, ApiError> {
        let url = with_limit(self.url(&["projects"]), limit);
        self.fetch_json(Method::GET, url, None, Access::Bearer).await
    }

    pub async fn blogs(&self, limit: Option<u32>) -> Result<Listing<Blog>, ApiError> {
        let url = with_limit(self.url(&["blogs"]), limit);
        self.fetch_json(Method::GET, url, None, Access::Bearer).await
    }

    // -- Contact messages --

    pub async fn contacts(&self) -> Result<Listing<ContactMessage>, ApiError> {
        self.fetch_json(Method::GET, self.url(&["contact"]), None, Access::Bearer)
            .await
    }

    pub async fn new_contacts(
        &self,
        limit: Option<u32>,
    ) -> Result<Listing<ContactMessage>, ApiError> {
        let url = with_limit(self.url(&["contact", "new"]), limit);
        self.fetch_json(Method::GET, url, None, Access::Bearer).await
    }

    pub async fn contact(&self, id: &str) -> Result<ContactMessage, ApiError> {
        let envelope: Envelope<ContactMessage> = self
            .fetch_json(Method::GET, self.url(&["contact", id]), None, Access::Bearer)
            .await?;
        Ok(envelope.data)
    }

    pub async fn update_contact_status(
        &self,
        id: &str,
        status: MessageStatus,
    ) -> Result<(), ApiError> {
        self.fetch_unit(
            Method::PATCH,
            self.url(&["contact", id, "status"]),
            Some(json!({ "status": status })),
        )
        .await
    }

    pub async fn delete_contact(&self, id: &str) -> Result<(), ApiError> {
        self.fetch_unit(Method::DELETE, self.url(&["contact", id]), None)
            .await
    }

    /// Server-generated CSV of every contact message.
    pub async fn export_contacts(&self) -> Result<Vec<u8>, ApiError> {
        self.fetch_bytes(self.url(&["contact", "export"])).await
    }

    // -- Admin --

    pub async fn users(&self) -> Result<Listing<UserRecord>, ApiError> {
        self.fetch_json(Method::GET, self.url(&["admin", "users"]), None, Access::Bearer)
            .await
    }

    pub async fn user(&self, id: &str) -> Result<UserRecord, ApiError> {
        let envelope: Envelope<UserRecord> = self
            .fetch_json(
                Method::GET,
                self.url(&["admin", "users", id]),
                None,
                Access::Bearer,
            )
            .await?;
        Ok(envelope.data)
    }

    pub async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<(), ApiError> {
        let body = to_body(update)?;
        self.fetch_unit(Method::PUT, self.url(&["admin", "users", id]), Some(body))
            .await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.fetch_unit(Method::DELETE, self.url(&["admin", "users", id]), None)
            .await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let envelope: Envelope<DashboardStats> = self
            .fetch_json(
                Method::GET,
                self.url(&["admin", "dashboard"]),
                None,
                Access::Bearer,
            )
            .await?;
        Ok(envelope.data)
    }

    pub async fn chart_data(&self) -> Result<ChartData, ApiError> {
        let envelope: Envelope<ChartData> = self
            .fetch_json(
                Method::GET,
                self.url(&["admin", "chart-data"]),
                None,
                Access::Bearer,
            )
            .await?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_limit_appends_query() {
        let url = Url::parse("http://localhost/api/projects").unwrap();
        assert_eq!(
            with_limit(url.clone(), Some(3)).as_str(),
            "http://localhost/api/projects?limit=3"
        );
        assert_eq!(with_limit(url, None).as_str(), "http://localhost/api/projects");
    }
}
