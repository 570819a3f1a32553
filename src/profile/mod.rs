//! Current-user profile subsystem.
//!
//! # Data Flow
//! ```text
//! refresh()
//!     → AuthSignal (asked once; unauthenticated → Skipped, nothing else happens)
//!     → load(): ApiClient GET {endpoint}?{relations_key}[]=...
//!     → mapper.rs from_wire (group "main")
//!     → store.rs set_profile → ArcSwap cell + broadcast
//!     → subscription.rs (replay current, then each transition)
//!
//! update(user)
//!     → mapper.rs to_wire (group "update")
//!     → ApiClient PUT (or tunneled multipart POST)
//!     → store.rs set_profile(user)
//! ```
//!
//! # Design Decisions
//! - The store is an explicit object with injected collaborators; several
//!   independent stores may coexist
//! - Network and mapping failures never leave a partially applied value

pub mod mapper;
pub mod store;
pub mod subscription;
pub mod types;

pub use mapper::{serialize_fields, GroupMapper, ProfileMapper};
pub use store::ProfileStore;
pub use subscription::ProfileSubscription;
pub use types::{
    MappingError, Profile, ProfileError, ProfileResult, ProfileState, RefreshOutcome, MAIN_GROUP, UPDATE_GROUP,
};
