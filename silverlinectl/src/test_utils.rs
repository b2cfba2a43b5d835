//! Test utilities for CLI testing
//!
//! Provides a mock Silverline portal and test helpers for integration
//! testing. The mock mirrors the `ip_objects` API closely enough to exercise
//! the client: token-checked endpoints, one-or-many `data` shapes, and
//! `links` generation on paged collection fetches.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use silverline_core::api::{
    AddIpObjectRequest, IpObject, IpObjectAttributes, IpObjectMeta, IpObjectsResponse,
    MaybeIpObject, NavigationLinks, OneOrMany,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// API key the mock accepts; anything else gets a 401.
pub const MOCK_API_KEY: &str = "test-api-key";

/// Mock server state
#[derive(Debug, Clone)]
pub struct MockServerState {
    /// IP objects per list type ("denylist"/"allowlist")
    pub objects: Arc<Mutex<HashMap<String, Vec<IpObject>>>>,
    /// Method + path of every request that passed the token check
    pub requests: Arc<Mutex<Vec<String>>>,
    next_id: Arc<Mutex<u64>>,
}

impl Default for MockServerState {
    fn default() -> Self {
        let mut objects = HashMap::new();
        objects.insert("denylist".to_string(), Vec::new());
        objects.insert("allowlist".to_string(), Vec::new());

        Self {
            objects: Arc::new(Mutex::new(objects)),
            requests: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }
}

impl MockServerState {
    fn record(&self, method: &str, path: &str) {
        self.requests
            .lock()
            .unwrap()
            .push(format!("{} {}", method, path));
    }

    fn fresh_id(&self) -> String {
        let mut next = self.next_id.lock().unwrap();
        let id = format!("obj-{}", *next);
        *next += 1;
        id
    }
}

/// Build an IP object the way the portal would return it.
pub fn sample_ip_object(id: &str, ip: &str) -> IpObject {
    IpObject {
        id: id.to_string(),
        kind: "ip_objects".to_string(),
        attributes: IpObjectAttributes {
            ip: ip.to_string(),
            mask: Some("32".to_string()),
            duration: Some(0),
            expires_at: None,
            list_target: Some("proxy-routed".to_string()),
        },
        meta: IpObjectMeta {
            note: Some(String::new()),
            tags: Some(Vec::new()),
            created_at: Some("2021-05-13T13:54:34.416Z".to_string()),
            updated_at: Some("2021-05-13T13:54:34.416Z".to_string()),
        },
    }
}

/// Mock Silverline portal
#[derive(Debug)]
pub struct MockServer {
    state: MockServerState,
    port: u16,
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServer {
    /// Create a new mock server
    pub fn new() -> Self {
        Self {
            state: MockServerState::default(),
            port: 0, // Will be assigned when server starts
        }
    }

    /// Seed a list with objects before a test
    pub fn seed(&self, list_type: &str, objects: Vec<IpObject>) {
        self.state
            .objects
            .lock()
            .unwrap()
            .insert(list_type.to_string(), objects);
    }

    /// Start the mock server and return the portal URL
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = self.create_router();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let server_url = format!("http://127.0.0.1:{}", self.port);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        // Give the server a moment to start and verify it's running
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
        }

        Ok((self, server_url))
    }

    /// Get the server port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the server state
    pub fn state(&self) -> &MockServerState {
        &self.state
    }

    fn create_router(&self) -> Router {
        Router::new()
            .route(
                "/api/v1/ip_lists/:list_type/ip_objects",
                get(list_objects_handler).post(add_object_handler),
            )
            .route(
                "/api/v1/ip_lists/:list_type/ip_objects/:id",
                get(get_object_handler).delete(delete_object_handler),
            )
            .with_state(self.state.clone())
    }
}

fn check_token(headers: &HeaderMap) -> Result<(), Response> {
    let token = headers
        .get("X-Authorization-Token")
        .and_then(|v| v.to_str().ok());
    if token == Some(MOCK_API_KEY) {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"errors": [{"title": "Unauthorized"}]})),
        )
            .into_response())
    }
}

fn page_params(params: &HashMap<String, String>) -> Option<(u64, u64)> {
    let size = params.get("page[size]")?.parse().ok()?;
    let number = params.get("page[number]")?.parse().ok()?;
    Some((size, number))
}

// Handler functions

async fn list_objects_handler(
    Path(list_type): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<MockServerState>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = check_token(&headers) {
        return resp;
    }
    state.record("GET", &format!("/{}/ip_objects", list_type));

    let all = state
        .objects
        .lock()
        .unwrap()
        .get(&list_type)
        .cloned()
        .unwrap_or_default();

    let (data, links) = match page_params(&params) {
        Some((size, number)) if size > 0 => {
            let start = (number.saturating_sub(1) * size) as usize;
            let page: Vec<IpObject> = all.iter().skip(start).take(size as usize).cloned().collect();
            let last = (all.len() as u64).div_ceil(size).max(1);
            let link = |n: u64| {
                format!(
                    "/api/v1/ip_lists/{}/ip_objects?page[number]={}&page[size]={}",
                    list_type, n, size
                )
            };
            let links = NavigationLinks {
                current: Some(link(number)),
                last: if number < last { Some(link(last)) } else { None },
                first: Some(link(1)),
                next: if number < last {
                    Some(link(number + 1))
                } else {
                    None
                },
            };
            (page, Some(links))
        }
        _ => (all, None),
    };

    Json(IpObjectsResponse {
        data: OneOrMany::Many(data.into_iter().map(|o| MaybeIpObject(Some(o))).collect()),
        links,
    })
    .into_response()
}

async fn get_object_handler(
    Path((list_type, id)): Path<(String, String)>,
    State(state): State<MockServerState>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = check_token(&headers) {
        return resp;
    }
    state.record("GET", &format!("/{}/ip_objects/{}", list_type, id));

    let found = state
        .objects
        .lock()
        .unwrap()
        .get(&list_type)
        .and_then(|objects| objects.iter().find(|o| o.id == id).cloned());

    match found {
        // Single-object lookups return `data` as one mapping, not a sequence
        Some(object) => Json(IpObjectsResponse {
            data: OneOrMany::One(MaybeIpObject(Some(object))),
            links: None,
        })
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"errors": [{"title": "Not Found", "detail": id}]})),
        )
            .into_response(),
    }
}

async fn add_object_handler(
    Path(list_type): Path<String>,
    State(state): State<MockServerState>,
    headers: HeaderMap,
    Json(request): Json<AddIpObjectRequest>,
) -> Response {
    if let Err(resp) = check_token(&headers) {
        return resp;
    }
    state.record("POST", &format!("/{}/ip_objects", list_type));

    let object = IpObject {
        id: state.fresh_id(),
        kind: "ip_objects".to_string(),
        attributes: IpObjectAttributes {
            ip: request.data.attributes.ip,
            mask: Some(request.data.attributes.mask),
            duration: Some(request.data.attributes.duration),
            expires_at: None,
            list_target: Some(request.list_target),
        },
        meta: IpObjectMeta {
            note: Some(request.data.meta.note),
            tags: Some(request.data.meta.tags),
            created_at: Some("2021-05-13T13:54:34.416Z".to_string()),
            updated_at: Some("2021-05-13T13:54:34.416Z".to_string()),
        },
    };

    state
        .objects
        .lock()
        .unwrap()
        .entry(list_type)
        .or_default()
        .push(object);

    // The real API returns no body on a successful create
    StatusCode::CREATED.into_response()
}

async fn delete_object_handler(
    Path((list_type, id)): Path<(String, String)>,
    State(state): State<MockServerState>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = check_token(&headers) {
        return resp;
    }
    state.record("DELETE", &format!("/{}/ip_objects/{}", list_type, id));

    let mut objects = state.objects.lock().unwrap();
    let list = objects.entry(list_type).or_default();
    let before = list.len();
    list.retain(|o| o.id != id);

    if list.len() < before {
        StatusCode::OK.into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"errors": [{"title": "Not Found", "detail": id}]})),
        )
            .into_response()
    }
}
