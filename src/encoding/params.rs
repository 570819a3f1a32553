//! Query-string encoding.
//!
//! # Rules
//! - list → one `key[]` entry per element (repeated key, never comma-joined)
//! - boolean → `"1"` / `"0"`
//! - null → key present with an empty value
//! - undefined → key omitted
//! - any other scalar → its string form

use crate::encoding::value::{ParamBag, ParamValue, Scalar};

/// Ordered query pairs, ready to be appended to a URL.
pub type QueryParams = Vec<(String, String)>;

/// Encode a parameter bag into query pairs, in bag order.
pub fn encode_params(bag: &ParamBag) -> QueryParams {
    let mut query = Vec::with_capacity(bag.len());

    for (key, value) in bag.iter() {
        match value {
            ParamValue::List(items) => {
                let list_key = format!("{}[]", key);
                query.extend(items.iter().map(|item| (list_key.clone(), item.to_string())));
            }
            ParamValue::Scalar(Scalar::Bool(flag)) => {
                let encoded = if *flag { "1" } else { "0" };
                query.push((key.to_string(), encoded.to_string()));
            }
            ParamValue::Null => query.push((key.to_string(), String::new())),
            ParamValue::Undefined => {}
            ParamValue::Scalar(scalar) => query.push((key.to_string(), scalar.to_string())),
        }
    }

    query
}
