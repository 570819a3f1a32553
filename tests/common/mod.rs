//! Shared utilities for integration testing.

#![allow(dead_code)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use profile_client::config::ProfileConfig;
use profile_client::http::{ApiRequest, Transport, TransportError, TransportResult};
use profile_client::{ApiClient, AuthSignal, GroupMapper, ProfileStore, StaticAuth};

pub const BASE_URL: &str = "http://api.test";

/// Profile shape used across the integration tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

pub fn alice() -> User {
    User {
        id: 1,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        roles: vec!["admin".to_string()],
    }
}

pub fn alice_json() -> Value {
    json!({
        "id": 1,
        "name": "Alice",
        "email": "alice@example.com",
        "roles": ["admin"],
    })
}

/// Transport that records every request and replays queued responses.
///
/// With nothing queued it answers `{}`.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<TransportResult<Value>>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond_with(&self, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(body));
    }

    pub fn fail_with(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> TransportResult<Value> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})))
    }
}

pub fn client(transport: Arc<RecordingTransport>) -> ApiClient {
    ApiClient::new(BASE_URL, transport)
}

/// Store over `transport` with the given auth signal and profile config.
pub fn store_with(
    transport: Arc<RecordingTransport>,
    auth: impl AuthSignal + 'static,
    config: ProfileConfig,
) -> ProfileStore<User> {
    ProfileStore::new(client(transport), Arc::new(auth), Arc::new(GroupMapper::<User>::new()), config)
}

pub fn authenticated_store(transport: Arc<RecordingTransport>) -> ProfileStore<User> {
    store_with(transport, StaticAuth::new(true), ProfileConfig::default())
}
