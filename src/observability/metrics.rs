//! Metrics collection.
//!
//! # Metrics
//! - `api_requests_total` (counter): requests by method and outcome
//! - `api_request_duration_seconds` (histogram): latency by method
//! - `profile_transitions_total` (counter): profile state changes by kind
//!
//! # Design Decisions
//! - The library never installs a recorder; without one these calls are no-ops
//! - Labels are static strings only

use std::time::Duration;

use crate::http::Method;

/// Record a completed API request.
pub fn record_request(method: Method, outcome: &'static str, elapsed: Duration) {
    ::metrics::counter!("api_requests_total", "method" => method.as_str(), "outcome" => outcome).increment(1);
    ::metrics::histogram!("api_request_duration_seconds", "method" => method.as_str())
        .record(elapsed.as_secs_f64());
}

/// Record a profile state transition.
pub fn record_profile_transition(kind: &'static str) {
    ::metrics::counter!("profile_transitions_total", "kind" => kind).increment(1);
}
