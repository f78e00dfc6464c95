// Wire types for the CMS API. Records are lenient: only the fields the
// console displays are typed, and every one of them has a default.
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::session::Role;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(rename = "_id", alias = "id", deserialize_with = "text")]
    pub id: String,
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Blog {
    #[serde(rename = "_id", alias = "id", deserialize_with = "text")]
    pub id: String,
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Lifecycle of a contact message. Only the server changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    New,
    Read,
    Replied,
    /// Any status this console has no action for
    #[serde(other)]
    Unknown,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::New => "new",
            MessageStatus::Read => "read",
            MessageStatus::Replied => "replied",
            MessageStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactMessage {
    #[serde(rename = "_id", alias = "id", deserialize_with = "text")]
    pub id: String,
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub email: String,
    #[serde(deserialize_with = "optional_text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "text")]
    pub message: String,
    #[serde(deserialize_with = "lenient")]
    pub status: MessageStatus,
    #[serde(deserialize_with = "lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    #[serde(rename = "_id", alias = "id", deserialize_with = "text")]
    pub id: String,
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub email: String,
    #[serde(deserialize_with = "lenient")]
    pub role: Role,
    #[serde(deserialize_with = "lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_contacts: u64,
    pub total_projects: u64,
    pub total_blogs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub visitors: Vec<f64>,
    pub users: Vec<f64>,
}

/// Decode a field, falling back to its default when the value is null or
/// has a shape the console does not expect.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Scalars as display text; null and nested values read as absent.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_text(deserializer).map(Option::unwrap_or_default)
}

/// `{ count, data: [...] }` list envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Listing<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Listing<T> {
    /// Server-reported count, or the page length when the server omits it.
    pub fn total(&self) -> u64 {
        self.count.unwrap_or(self.data.len() as u64)
    }
}

/// `{ data: ... }` single-record envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginResponse {
    pub success: bool,
    pub token: Option<String>,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl LoginResponse {
    pub fn user_name(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .get("name")?
            .as_str()
            .filter(|n| !n.is_empty())
    }

    pub fn user_role(&self) -> Role {
        self.data
            .as_ref()
            .and_then(|d| d.get("role"))
            .and_then(|r| r.as_str())
            .map(Role::parse)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterResponse {
    pub success: bool,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn contact_message_reads_mongo_shape() {
        let msg: ContactMessage = serde_json::from_value(json!({
            "_id": "m1",
            "name": "Grace",
            "email": "grace@example.com",
            "message": "Hello",
            "status": "replied",
            "createdAt": "2024-03-01T10:00:00.000Z",
            "__v": 0
        }))
        .unwrap();

        assert_eq!(msg.id, "m1");
        assert_eq!(msg.status, MessageStatus::Replied);
        assert!(msg.phone.is_none());
        assert!(msg.created_at.is_some());
    }

    #[test]
    fn records_tolerate_missing_fields() {
        let user: UserRecord = serde_json::from_value(json!({ "id": "u1" })).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.role, Role::User);
        assert!(user.name.is_empty());
    }

    #[test]
    fn odd_message_does_not_sink_the_listing() {
        let listing: Listing<ContactMessage> = serde_json::from_value(json!({
            "count": 3,
            "data": [
                { "_id": "m1", "name": "Ada", "status": "new" },
                {
                    "_id": 42,
                    "name": null,
                    "email": null,
                    "phone": 5550100,
                    "message": null,
                    "status": "archived",
                    "createdAt": "last tuesday"
                },
                { "_id": "m3", "name": "Grace", "status": null, "createdAt": "2024-03-01T10:00:00Z" }
            ]
        }))
        .unwrap();

        assert_eq!(listing.data.len(), 3);
        let odd = &listing.data[1];
        assert_eq!(odd.id, "42");
        assert!(odd.name.is_empty());
        assert_eq!(odd.phone.as_deref(), Some("5550100"));
        assert_eq!(odd.status, MessageStatus::Unknown);
        assert!(odd.created_at.is_none());
        assert_eq!(listing.data[2].status, MessageStatus::New);
        assert!(listing.data[2].created_at.is_some());
    }

    #[test]
    fn odd_user_and_project_records_decode() {
        let users: Listing<UserRecord> = serde_json::from_value(json!({
            "data": [
                { "_id": "u1", "name": "Ada", "role": "admin" },
                { "_id": "u2", "name": null, "role": null, "createdAt": 17 }
            ]
        }))
        .unwrap();
        assert_eq!(users.data[0].role, Role::Admin);
        assert_eq!(users.data[1].role, Role::User);
        assert!(users.data[1].name.is_empty());

        let projects: Listing<Project> = serde_json::from_value(json!({
            "data": [
                { "_id": "p1", "title": "Site Redesign" },
                { "_id": "p2", "title": null, "status": 3 }
            ]
        }))
        .unwrap();
        assert_eq!(projects.data.len(), 2);
        assert!(projects.data[1].title.is_empty());
        assert!(projects.data[1].status.is_none());
    }

    #[test]
    fn listing_total_falls_back_to_len() {
        let listing: Listing<Project> =
            serde_json::from_value(json!({ "data": [{ "_id": "p1" }, { "_id": "p2" }] }))
                .unwrap();
        assert_eq!(listing.total(), 2);

        let listing: Listing<Project> =
            serde_json::from_value(json!({ "count": 9, "data": [] })).unwrap();
        assert_eq!(listing.total(), 9);
    }

    #[test]
    fn login_response_extracts_user_details() {
        let response: LoginResponse = serde_json::from_value(json!({
            "success": true,
            "token": "t",
            "data": { "name": "A", "role": "admin", "email": "a@example.com" }
        }))
        .unwrap();

        assert_eq!(response.user_name(), Some("A"));
        assert_eq!(response.user_role(), Role::Admin);
    }

    #[test]
    fn login_response_without_role_is_user() {
        let response: LoginResponse = serde_json::from_value(json!({
            "success": true,
            "token": "t",
            "data": { "name": "B" }
        }))
        .unwrap();
        assert_eq!(response.user_role(), Role::User);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(MessageStatus::Read).unwrap(),
            json!("read")
        );
    }
}
