//! Mock CMS backend for integration tests.
//!
//! Serves a fixed data set under `/api` on an ephemeral port and records
//! every request it sees, including the `Authorization` header.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use atrium::api::ApiClient;
use atrium::config::{ApiConfig, Config};
use atrium::routes;
use atrium::session::{KeyValueStorage, MemoryStorage, Role, SessionStore, StorageError};
use atrium::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const PASSWORD: &str = "secret";
const VALID_TOKENS: [&str; 3] = ["admin-token", "user-token", "bare-token"];

#[derive(Debug, Clone)]
pub struct Hit {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
struct Shared {
    hits: Arc<Mutex<Vec<Hit>>>,
    failures: Arc<Mutex<HashMap<String, (StatusCode, Value)>>>,
}

pub struct MockCms {
    pub base_url: String,
    shared: Shared,
}

impl MockCms {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shared = Shared::default();
        let app = Router::new().fallback(handle).with_state(shared.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            shared,
        }
    }

    /// Make `path` (relative to `/api`) answer with `status` and `body`.
    pub fn fail(&self, path: &str, status: StatusCode, body: Value) {
        self.shared
            .failures
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body));
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.shared.hits.lock().unwrap().clone()
    }

    pub fn hits_for(&self, method: Method, path: &str) -> Vec<Hit> {
        self.hits()
            .into_iter()
            .filter(|h| h.method == method && h.path == path)
            .collect()
    }

    pub fn client(&self, store: SessionStore) -> ApiClient {
        let config = ApiConfig {
            base_url: self.base_url.clone(),
            timeout_secs: 5,
        };
        ApiClient::new(&config, store).unwrap()
    }

    /// The console router wired to this backend.
    pub fn console(&self, store: SessionStore) -> Router {
        let mut config = Config::default();
        config.api.base_url = self.base_url.clone();
        let state = AppState::new(config, self.client(store));
        routes::router(state)
    }
}

pub fn admin_session() -> SessionStore {
    let store = SessionStore::in_memory();
    store.set("admin-token", "Root Admin", Role::Admin).unwrap();
    store
}

/// Storage that counts how often the session gets wiped.
#[derive(Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    pub clears: AtomicUsize,
}

impl CountingStorage {
    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl KeyValueStorage for CountingStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key)
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError> {
        self.inner.set_items(items)
    }

    fn remove_items(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.inner.remove_items(keys)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}

// -- Fixtures --

fn messages() -> Vec<Value> {
    vec![
        json!({
            "_id": "m1",
            "name": "Lovelace, Ada",
            "email": "ada@example.com",
            "message": "She said \"hi\"\nand <script>alert(1)</script>",
            "status": "new",
            "createdAt": "2024-03-01T10:00:00Z"
        }),
        json!({
            "_id": "m2",
            "name": "Grace",
            "email": "grace@example.com",
            "phone": "555-0100",
            "message": "Thanks!",
            "status": "read",
            "createdAt": "2024-03-02T09:30:00Z"
        }),
    ]
}

fn users() -> Vec<Value> {
    vec![json!({
        "_id": "u1",
        "name": "Ada",
        "email": "ada@example.com",
        "role": "user",
        "createdAt": "2024-01-15T08:00:00Z"
    })]
}

fn login(body: &Value) -> (StatusCode, Value) {
    if body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            json!({ "success": false, "error": "Invalid credentials" }),
        );
    }
    match body["email"].as_str().unwrap_or_default() {
        "admin@example.com" => (
            StatusCode::OK,
            json!({
                "success": true,
                "token": "admin-token",
                "data": { "name": "Root Admin", "email": "admin@example.com", "role": "admin" }
            }),
        ),
        "user@example.com" => (
            StatusCode::OK,
            json!({
                "success": true,
                "token": "user-token",
                "data": { "name": "Ada", "email": "user@example.com", "role": "user" }
            }),
        ),
        "nodata@example.com" => (
            StatusCode::OK,
            json!({ "success": true, "token": "bare-token" }),
        ),
        "broken@example.com" => (StatusCode::OK, json!({ "success": true })),
        _ => (
            StatusCode::UNAUTHORIZED,
            json!({ "success": false, "error": "Invalid credentials" }),
        ),
    }
}

fn register(body: &Value) -> Value {
    if body["email"] == "taken@example.com" {
        json!({ "success": false, "error": "Email already registered" })
    } else {
        json!({ "success": true })
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| VALID_TOKENS.contains(&token))
}

async fn handle(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(uri.path())
        .to_string();
    let body: Option<Value> = serde_json::from_slice(&body).ok();

    shared.hits.lock().unwrap().push(Hit {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });

    if let Some((status, body)) = shared.failures.lock().unwrap().get(&path).cloned() {
        return (status, Json(body)).into_response();
    }

    let body = body.unwrap_or(Value::Null);
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    // Public endpoints
    match (method.as_str(), segments.as_slice()) {
        ("GET", ["test"]) => return Json(json!({ "message": "ok" })).into_response(),
        ("POST", ["auth", "login"]) => {
            let (status, json) = login(&body);
            return (status, Json(json)).into_response();
        }
        ("POST", ["auth", "register"]) => return Json(register(&body)).into_response(),
        _ => {}
    }

    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "error": "Not authorized" })),
        )
            .into_response();
    }

    let ok = json!({ "success": true });
    let json = match (method.as_str(), segments.as_slice()) {
        ("GET", ["projects"]) => json!({
            "count": 4,
            "data": [{ "_id": "p1", "title": "Site Redesign", "createdAt": "2024-03-01T10:00:00Z" }]
        }),
        ("GET", ["blogs"]) => json!({
            "count": 2,
            "data": [{ "_id": "b1", "title": "Hello", "status": "published" }]
        }),
        ("GET", ["contact"]) => json!({ "count": 2, "data": messages() }),
        ("GET", ["contact", "new"]) => json!({ "count": 1, "data": [messages()[0].clone()] }),
        ("GET", ["contact", "export"]) => {
            return (
                [(header::CONTENT_TYPE, "text/csv")],
                "Name,Email\nGrace,grace@example.com\n",
            )
                .into_response()
        }
        ("GET", ["contact", id]) => match messages().into_iter().find(|m| m["_id"] == *id) {
            Some(message) => json!({ "data": message }),
            None => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Contact not found" })),
                )
                    .into_response()
            }
        },
        ("PATCH", ["contact", _, "status"]) | ("DELETE", ["contact", _]) => ok,
        ("GET", ["admin", "users"]) => json!({ "count": 1, "data": users() }),
        ("GET", ["admin", "users", id]) => match users().into_iter().find(|u| u["_id"] == *id) {
            Some(user) => json!({ "data": user }),
            None => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "User not found" })),
                )
                    .into_response()
            }
        },
        ("PUT", ["admin", "users", _]) | ("DELETE", ["admin", "users", _]) => ok,
        ("GET", ["admin", "dashboard"]) => json!({
            "data": { "totalUsers": 10, "totalContacts": 2, "totalProjects": 4, "totalBlogs": 2 }
        }),
        ("GET", ["admin", "chart-data"]) => json!({
            "data": { "labels": ["Jan", "Feb"], "visitors": [100, 150], "users": [5] }
        }),
        _ => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Route not found" })),
            )
                .into_response()
        }
    };
    Json(json).into_response()
}
