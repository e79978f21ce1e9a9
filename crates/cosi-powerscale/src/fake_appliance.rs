//! In-process stand-in for the OneFS platform API.
//!
//! [`FakeAppliance`] serves the bucket, user, key and namespace endpoints on
//! a loopback port so that [`PowerscaleClient`] can be exercised over real
//! HTTP, here and in downstream crates.
//!
//! [`PowerscaleClient`]: crate::PowerscaleClient

use std::collections::{HashMap, HashSet};
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{Method, StatusCode};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use crate::PowerscaleConfig;
use crate::types::{
    AccessKey, AclEntry, AclUpdate, Bucket, BucketList, KeyEnvelope, User, UserList,
};

/// One request as seen by the appliance.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub zone: Option<String>,
    pub authenticated: bool,
}

#[derive(Default)]
struct ApplianceState {
    buckets: HashMap<String, Bucket>,
    users: HashMap<String, User>,
    keys: HashMap<String, AccessKey>,
    directories: HashSet<String>,
    requests: Vec<RecordedRequest>,
    fail_next: Option<StatusCode>,
    minted: u64,
}

type Shared = Arc<Mutex<ApplianceState>>;

fn lock(state: &Shared) -> MutexGuard<'_, ApplianceState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found(what: &str) -> Response {
    let message = format!("{what} not found");
    let body = json!({ "errors": [{ "code": "AEC_NOT_FOUND", "message": message }] });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

fn conflict(what: &str) -> Response {
    let message = format!("{what} already exists");
    let body = json!({ "errors": [{ "code": "AEC_CONFLICT", "message": message }] });
    (StatusCode::CONFLICT, Json(body)).into_response()
}

/// A fake appliance listening on an ephemeral local port.
///
/// Every request must carry basic auth for [`USERNAME`](Self::USERNAME) and
/// [`PASSWORD`](Self::PASSWORD). The server stops when the value is dropped.
pub struct FakeAppliance {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl FakeAppliance {
    /// User name accepted by the appliance.
    pub const USERNAME: &'static str = "admin";
    /// Password accepted by the appliance.
    pub const PASSWORD: &'static str = "secret";

    /// Binds a loopback port and starts serving.
    pub async fn start() -> io::Result<Self> {
        let state = Shared::default();
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let router = Router::new()
            .route("/platform/14/protocols/s3/buckets", post(create_bucket))
            .route(
                "/platform/14/protocols/s3/buckets/{name}",
                get(get_bucket).put(update_bucket).delete(delete_bucket),
            )
            .route("/platform/14/auth/users", post(create_user))
            .route(
                "/platform/14/auth/users/{name}",
                get(get_user).delete(delete_user),
            )
            .route(
                "/platform/14/protocols/s3/keys/{name}",
                get(get_key).post(create_key).delete(delete_key),
            )
            .route("/namespace/{*path}", delete(delete_directory))
            .layer(from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            addr,
            state,
            server,
        })
    }

    /// Returns the base URL of the platform API.
    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{}", self.addr))
    }

    /// Returns a profile for backend `name` pointing at this appliance
    /// with valid credentials.
    pub fn config(&self, name: &str) -> Result<PowerscaleConfig, url::ParseError> {
        let config = PowerscaleConfig::new(name, self.endpoint()?)
            .with_credentials(Self::USERNAME, Self::PASSWORD);
        Ok(config)
    }

    /// Answers the next request with `status` instead of handling it.
    pub fn fail_next(&self, status: StatusCode) {
        lock(&self.state).fail_next = Some(status);
    }

    /// Returns every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    pub fn has_directory(&self, path: &str) -> bool {
        lock(&self.state).directories.contains(path)
    }

    pub fn has_bucket(&self, name: &str) -> bool {
        lock(&self.state).buckets.contains_key(name)
    }

    pub fn has_user(&self, name: &str) -> bool {
        lock(&self.state).users.contains_key(name)
    }

    pub fn has_key(&self, name: &str) -> bool {
        lock(&self.state).keys.contains_key(name)
    }

    pub fn bucket_acl(&self, name: &str) -> Vec<AclEntry> {
        lock(&self.state)
            .buckets
            .get(name)
            .map(|bucket| bucket.acl.clone())
            .unwrap_or_default()
    }
}

impl Drop for FakeAppliance {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let credentials = format!("{}:{}", FakeAppliance::USERNAME, FakeAppliance::PASSWORD);
    let expected = format!("Basic {}", STANDARD.encode(credentials));
    let authenticated = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    let zone = request.uri().query().and_then(|query| {
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix("zone="))
            .map(str::to_owned)
    });

    let injected = {
        let mut state = lock(&state);
        state.requests.push(RecordedRequest {
            method: request.method().clone(),
            path: request.uri().path().to_owned(),
            zone,
            authenticated,
        });
        state.fail_next.take()
    };

    if !authenticated {
        return (StatusCode::UNAUTHORIZED, "authorization required").into_response();
    }
    if let Some(status) = injected {
        return (status, "injected failure").into_response();
    }

    next.run(request).await
}

async fn get_bucket(State(state): State<Shared>, Path(name): Path<String>) -> Response {
    match lock(&state).buckets.get(&name) {
        Some(bucket) => Json(BucketList {
            buckets: vec![bucket.clone()],
            total: Some(1),
        })
        .into_response(),
        None => not_found("bucket"),
    }
}

async fn create_bucket(State(state): State<Shared>, Json(bucket): Json<Bucket>) -> Response {
    let mut state = lock(&state);
    if state.buckets.contains_key(&bucket.name) {
        return conflict("bucket");
    }
    if bucket.create_path {
        state.directories.insert(bucket.path.clone());
    }
    let id = bucket.name.clone();
    state.buckets.insert(id.clone(), bucket);
    (StatusCode::CREATED, Json(json!({ "id": id }))).into_response()
}

async fn update_bucket(
    State(state): State<Shared>,
    Path(name): Path<String>,
    Json(update): Json<AclUpdate>,
) -> Response {
    match lock(&state).buckets.get_mut(&name) {
        Some(bucket) => {
            bucket.acl = update.acl;
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found("bucket"),
    }
}

async fn delete_bucket(State(state): State<Shared>, Path(name): Path<String>) -> Response {
    match lock(&state).buckets.remove(&name) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found("bucket"),
    }
}

async fn delete_directory(State(state): State<Shared>, Path(path): Path<String>) -> Response {
    let path = format!("/{}", path.trim_start_matches('/'));
    if lock(&state).directories.remove(&path) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("directory")
    }
}

async fn get_user(State(state): State<Shared>, Path(name): Path<String>) -> Response {
    match lock(&state).users.get(&name) {
        Some(user) => Json(UserList {
            users: vec![user.clone()],
            total: Some(1),
        })
        .into_response(),
        None => not_found("user"),
    }
}

async fn create_user(State(state): State<Shared>, Json(user): Json<User>) -> Response {
    let mut state = lock(&state);
    if state.users.contains_key(&user.name) {
        return conflict("user");
    }
    let id = user.name.clone();
    state.users.insert(id.clone(), user);
    (StatusCode::CREATED, Json(json!({ "id": id }))).into_response()
}

async fn delete_user(State(state): State<Shared>, Path(name): Path<String>) -> Response {
    match lock(&state).users.remove(&name) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found("user"),
    }
}

async fn get_key(State(state): State<Shared>, Path(name): Path<String>) -> Response {
    let state = lock(&state);
    if !state.users.contains_key(&name) {
        return not_found("user");
    }
    let keys = state.keys.get(&name).cloned().unwrap_or_default();
    Json(KeyEnvelope { keys }).into_response()
}

async fn create_key(State(state): State<Shared>, Path(name): Path<String>) -> Response {
    let mut state = lock(&state);
    if !state.users.contains_key(&name) {
        return not_found("user");
    }
    state.minted += 1;
    let key = AccessKey::new(
        format!("1_{name}_accid{}", state.minted),
        format!("secret{}", state.minted),
    );
    state.keys.insert(name, key.clone());
    (StatusCode::CREATED, Json(KeyEnvelope { keys: key })).into_response()
}

async fn delete_key(State(state): State<Shared>, Path(name): Path<String>) -> Response {
    let mut state = lock(&state);
    if !state.users.contains_key(&name) {
        return not_found("user");
    }
    state.keys.remove(&name);
    StatusCode::NO_CONTENT.into_response()
}
