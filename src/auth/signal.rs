//! Authentication signals.
//!
//! # Implementations
//! - `StaticAuth`: a flag the host flips on login/logout
//! - `WatchAuth`: follows a `watch` channel fed by an auth service; an unset
//!   value (`None`) means "not yet determined" and is waited out

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Answers "is the current session authenticated?".
#[async_trait]
pub trait AuthSignal: Send + Sync {
    async fn is_authenticated(&self) -> bool;
}

/// Authentication flag shared between the host and the store.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    authenticated: Arc<AtomicBool>,
}

impl StaticAuth {
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated: Arc::new(AtomicBool::new(authenticated)),
        }
    }

    pub fn set(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuthSignal for StaticAuth {
    async fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }
}

/// Authentication state published through a `watch` channel.
#[derive(Debug, Clone)]
pub struct WatchAuth {
    rx: watch::Receiver<Option<bool>>,
}

impl WatchAuth {
    pub fn new(rx: watch::Receiver<Option<bool>>) -> Self {
        Self { rx }
    }
}

#[async_trait]
impl AuthSignal for WatchAuth {
    /// Resolves with the first determined value. A closed channel that never
    /// determined a value counts as unauthenticated.
    async fn is_authenticated(&self) -> bool {
        let mut rx = self.rx.clone();
        let authenticated = match rx.wait_for(Option::is_some).await {
            Ok(state) => state.unwrap_or(false),
            Err(_) => {
                tracing::debug!("Auth channel closed before a value was determined");
                false
            }
        };
        authenticated
    }
}
