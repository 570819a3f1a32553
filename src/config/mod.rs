//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → ApiConfig to the transport, ProfileConfig to the profile store
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the core only ever reads it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ClientConfig;
pub use schema::ApiConfig;
pub use schema::ProfileConfig;
pub use schema::ObservabilityConfig;
