//! Authentication-gated cache for the current user's profile.
//!
//! # States
//! - Absent: no profile held (initial state, and after `reset_profile`)
//! - Present(p): `p` is the current profile
//!
//! # State Transitions
//! ```text
//! refresh (authenticated, load ok) → Present(loaded)
//! update (PUT ok)                  → Present(caller's value)
//! set_profile                      → Present(value)
//! patch_profile                    → Present(current ⊕ partial), no-op when Absent
//! reset_profile                    → Absent
//! ```
//!
//! # Design Decisions
//! - One writer lock covers "store, then publish", so subscribers see
//!   transitions in the order they were applied and `subscribe` never misses
//!   or duplicates one
//! - Readers take lock-free `Arc` snapshots
//! - Failed loads and updates leave the state untouched
//! - Overlapping network operations apply in completion order

use arc_swap::ArcSwapOption;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

use crate::auth::AuthSignal;
use crate::config::ProfileConfig;
use crate::encoding::{Fields, ParamBag};
use crate::http::{ApiClient, RequestOptions};
use crate::observability::metrics;
use crate::profile::mapper::{serialize_fields, ProfileMapper};
use crate::profile::subscription::ProfileSubscription;
use crate::profile::types::{
    json_kind, MappingError, Profile, ProfileResult, ProfileState, RefreshOutcome, MAIN_GROUP, UPDATE_GROUP,
};

/// Holds the authenticated user's profile and publishes every change.
pub struct ProfileStore<P> {
    api: ApiClient,
    auth: Arc<dyn AuthSignal>,
    mapper: Arc<dyn ProfileMapper<P>>,
    config: ProfileConfig,
    current: ArcSwapOption<P>,
    publisher: Mutex<broadcast::Sender<ProfileState<P>>>,
}

impl<P: Profile> ProfileStore<P> {
    /// Create an empty store.
    pub fn new(
        api: ApiClient,
        auth: Arc<dyn AuthSignal>,
        mapper: Arc<dyn ProfileMapper<P>>,
        config: ProfileConfig,
    ) -> Self {
        let (tx, _) = broadcast::channel(config.channel_capacity.max(1));

        Self {
            api,
            auth,
            mapper,
            config,
            current: ArcSwapOption::empty(),
            publisher: Mutex::new(tx),
        }
    }

    /// Current profile snapshot.
    pub fn profile(&self) -> ProfileState<P> {
        self.current.load_full()
    }

    pub fn is_present(&self) -> bool {
        self.current.load().is_some()
    }

    /// Subscribe to the current state and all later transitions.
    pub fn subscribe(&self) -> ProfileSubscription<P> {
        let publisher = self.lock_publisher();
        let rx = publisher.subscribe();
        ProfileSubscription::new(self.current.load_full(), rx)
    }

    /// Reload the profile if the session is authenticated.
    ///
    /// Asks the auth signal exactly once. When unauthenticated nothing is
    /// fetched or published and [`RefreshOutcome::Skipped`] is returned.
    pub async fn refresh(&self) -> ProfileResult<RefreshOutcome<P>> {
        if !self.auth.is_authenticated().await {
            tracing::info!("Skipping profile refresh: session not authenticated");
            return Ok(RefreshOutcome::Skipped);
        }

        let profile = self.load().await?;
        Ok(RefreshOutcome::Loaded(self.set_profile(profile)))
    }

    /// Fetch and map the profile without touching the cached state.
    pub async fn load(&self) -> ProfileResult<P> {
        let mut params = ParamBag::new();
        if !self.config.relations.is_empty() {
            params.insert(self.config.relations_key.clone(), self.config.relations.clone());
        }

        let plain = self
            .api
            .get(&self.config.endpoint, &params, RequestOptions::default())
            .await?;

        Ok(self.mapper.from_wire(plain, &[MAIN_GROUP])?)
    }

    /// Save the profile remotely, then make `user` the current value.
    pub async fn update(&self, user: P) -> ProfileResult<Arc<P>> {
        self.update_with_attachments(user, Fields::new()).await
    }

    /// Like [`update`](Self::update), with extra fields (typically a `file`
    /// upload) overlaid on the mapped record. A `file`/`files` key switches
    /// the request to a tunneled multipart PUT.
    pub async fn update_with_attachments(&self, user: P, attachments: Fields) -> ProfileResult<Arc<P>> {
        let mut plain = self.mapper.to_wire(&user, &[UPDATE_GROUP])?;
        plain.merge(attachments);

        self.api
            .put(&self.config.endpoint, &plain, RequestOptions::default())
            .await?;

        Ok(self.set_profile(user))
    }

    /// Change the password. The cached profile is not touched.
    pub async fn update_password<T: Serialize + ?Sized>(&self, passwords: &T) -> ProfileResult<()> {
        let plain = serialize_fields(passwords)?;

        self.api
            .put(&self.config.endpoint, &plain, RequestOptions::default())
            .await?;

        Ok(())
    }

    /// Replace the current profile.
    pub fn set_profile(&self, user: P) -> Arc<P> {
        let profile = Arc::new(user);
        let publisher = self.lock_publisher();
        self.apply(&publisher, Some(profile.clone()), "set");
        profile
    }

    /// Overlay `partial` on the current profile's top-level fields.
    ///
    /// Returns `Ok(None)` without publishing when no profile is held.
    pub fn patch_profile(&self, partial: Map<String, Value>) -> ProfileResult<ProfileState<P>> {
        let publisher = self.lock_publisher();

        let current = match self.current.load_full() {
            Some(current) => current,
            None => {
                tracing::debug!("Ignoring profile patch: no profile held");
                return Ok(None);
            }
        };

        let mut merged = match serde_json::to_value(current.as_ref()) {
            Ok(Value::Object(fields)) => fields,
            Ok(other) => return Err(MappingError::NotAnObject(json_kind(&other)).into()),
            Err(e) => return Err(MappingError::Serialize(e.to_string()).into()),
        };
        merged.extend(partial);

        let patched: P = serde_json::from_value(Value::Object(merged))
            .map_err(|e| MappingError::Deserialize(e.to_string()))?;
        let profile = Arc::new(patched);

        self.apply(&publisher, Some(profile.clone()), "patch");
        Ok(Some(profile))
    }

    /// Forget the current profile (e.g. on logout).
    pub fn reset_profile(&self) {
        let publisher = self.lock_publisher();
        self.apply(&publisher, None, "reset");
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    fn apply(&self, publisher: &broadcast::Sender<ProfileState<P>>, state: ProfileState<P>, kind: &'static str) {
        let present = state.is_some();
        self.current.store(state.clone());
        // No subscribers is not an error.
        let _ = publisher.send(state);

        metrics::record_profile_transition(kind);
        tracing::debug!(kind, present, "Profile state changed");
    }

    fn lock_publisher(&self) -> MutexGuard<'_, broadcast::Sender<ProfileState<P>>> {
        self.publisher.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P> fmt::Debug for ProfileStore<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileStore")
            .field("api", &self.api)
            .field("endpoint", &self.config.endpoint)
            .field("present", &self.current.load().is_some())
            .finish()
    }
}
