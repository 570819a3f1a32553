//! Authentication state capability.
//!
//! The profile store never decides who is logged in; it asks an
//! [`AuthSignal`] once per refresh and acts on the answer.

pub mod signal;

pub use signal::{AuthSignal, StaticAuth, WatchAuth};
