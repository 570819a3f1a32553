//! REST request encoding and an authentication-gated profile cache.
//!
//! # Architecture Overview
//!
//! ```text
//!   application code
//!        │  ParamBag / Fields / RequestOptions
//!        ▼
//!  ┌──────────────┐   encode_params / encode_form / has_files   ┌────────────┐
//!  │  http::      │────────────────────────────────────────────▶│ encoding   │
//!  │  ApiClient   │                                             └────────────┘
//!  └──────┬───────┘
//!         │ ApiRequest (explicit RequestBody)
//!         ▼
//!  ┌──────────────┐          ┌──────────────┐
//!  │  Transport   │─────────▶│  remote API  │
//!  └──────────────┘          └──────────────┘
//!         ▲
//!         │ load / update / update_password
//!  ┌──────┴───────┐  asks   ┌──────────────┐
//!  │ ProfileStore │────────▶│  AuthSignal  │
//!  └──────┬───────┘         └──────────────┘
//!         │ ProfileMapper (groups "main" / "update")
//!         ▼
//!   subscribers (replay current, then every transition)
//! ```

pub mod auth;
pub mod config;
pub mod encoding;
pub mod http;
pub mod observability;
pub mod profile;

pub use auth::{AuthSignal, StaticAuth, WatchAuth};
pub use config::ClientConfig;
pub use encoding::{FieldValue, Fields, FilePart, ParamBag, ParamValue, Scalar};
pub use http::{ApiClient, HttpTransport, RequestOptions, Transport, TransportError};
pub use profile::{GroupMapper, ProfileError, ProfileMapper, ProfileStore, RefreshOutcome};
