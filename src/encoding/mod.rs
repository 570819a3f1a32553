//! Request payload encoding subsystem.
//!
//! # Data Flow
//! ```text
//! call-site values (scalars, lists, null, nested maps, files)
//!     → value.rs (ParamBag for query verbs, Fields for body verbs)
//!     → params.rs (ParamBag → ordered query pairs)
//!     → form.rs (Fields → multipart FormPayload, bracket-named)
//!     → http::gateway picks the encoding per verb and payload shape
//! ```
//!
//! # Design Decisions
//! - Encoders are pure functions; no I/O, no errors
//! - Insertion order is preserved end to end so encodings are deterministic
//! - `Undefined` is a real variant so "absent" and "explicitly null" stay distinct

pub mod form;
pub mod params;
pub mod value;

pub use form::{encode_form, has_files, FormField, FormFieldValue, FormPayload, METHOD_OVERRIDE_FIELD};
pub use params::{encode_params, QueryParams};
pub use value::{FieldValue, Fields, FilePart, ParamBag, ParamValue, Scalar};
