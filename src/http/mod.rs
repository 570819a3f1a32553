//! HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! caller (endpoint, ParamBag | Fields, RequestOptions)
//!     → gateway.rs (choose query / JSON / multipart, tunnel file PUTs)
//!     → request.rs (ApiRequest with request ID and explicit body kind)
//!     → transport.rs (Transport trait; HttpTransport over reqwest)
//!     → JSON response body or TransportError, returned unchanged
//! ```

pub mod gateway;
pub mod request;
pub mod transport;

pub use gateway::ApiClient;
pub use request::{ApiRequest, Method, RequestBody, RequestOptions, X_REQUEST_ID};
pub use transport::{HttpTransport, Transport, TransportError, TransportResult};
