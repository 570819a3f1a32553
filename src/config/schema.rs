//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Root configuration for the profile client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Remote API connection settings.
    pub api: ApiConfig,

    /// Profile cache settings.
    pub profile: ProfileConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Remote API connection settings.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint is appended to (e.g., "https://example.com/api").
    pub base_url: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,

    /// User-Agent sent with every request.
    pub user_agent: String,

    /// Headers sent with every request.
    pub default_headers: BTreeMap<String, String>,

    /// Bearer token for the Authorization header.
    pub bearer_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
            user_agent: concat!("profile-client/", env!("CARGO_PKG_VERSION")).to_string(),
            default_headers: BTreeMap::new(),
            bearer_token: None,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("default_headers", &self.default_headers)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Profile cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Endpoint serving the authenticated user's profile.
    pub endpoint: String,

    /// Relations to eager-load with the profile.
    pub relations: Vec<String>,

    /// Query key the relations are sent under.
    pub relations_key: String,

    /// Transitions buffered per subscriber before it starts lagging.
    pub channel_capacity: usize,

    /// Field allow-lists per mapping group ("main", "update", ...).
    /// A group with no entry keeps every field.
    pub groups: BTreeMap<String, Vec<String>>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            endpoint: "/profile".to_string(),
            relations: Vec::new(),
            relations_key: "with".to_string(),
            channel_capacity: 64,
            groups: BTreeMap::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
