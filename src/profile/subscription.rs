//! Subscriber side of the profile store.
//!
//! A subscription first yields the state current at subscription time, then
//! every later transition in publish order. Earlier history is never replayed.

use futures_util::stream::{self, Stream};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::profile::types::ProfileState;

/// Receives profile state transitions.
#[derive(Debug)]
pub struct ProfileSubscription<P> {
    initial: Option<ProfileState<P>>,
    rx: broadcast::Receiver<ProfileState<P>>,
}

impl<P: Send + Sync + 'static> ProfileSubscription<P> {
    pub(crate) fn new(initial: ProfileState<P>, rx: broadcast::Receiver<ProfileState<P>>) -> Self {
        Self {
            initial: Some(initial),
            rx,
        }
    }

    /// Wait for the next state. Returns `None` once the store is gone.
    ///
    /// A subscriber that falls more than the channel capacity behind skips
    /// the transitions it missed.
    pub async fn recv(&mut self) -> Option<ProfileState<P>> {
        if let Some(state) = self.initial.take() {
            return Some(state);
        }

        loop {
            match self.rx.recv().await {
                Ok(state) => return Some(state),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Profile subscriber lagged, skipping transitions");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next state if one is already available.
    pub fn try_recv(&mut self) -> Option<ProfileState<P>> {
        if let Some(state) = self.initial.take() {
            return Some(state);
        }

        loop {
            match self.rx.try_recv() {
                Ok(state) => return Some(state),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Profile subscriber lagged, skipping transitions");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Adapt into a `Stream` of states.
    pub fn into_stream(self) -> impl Stream<Item = ProfileState<P>> {
        stream::unfold(self, |mut subscription| async move {
            subscription.recv().await.map(|state| (state, subscription))
        })
    }
}
