//! Mapping between typed profiles and wire records.
//!
//! # Responsibilities
//! - Turn a typed profile into the `Fields` sent on update
//! - Turn a JSON response into a typed profile
//! - Restrict each direction to the fields of the named groups
//!
//! # Design Decisions
//! - Groups only filter top-level fields
//! - A group without a configured allow-list keeps every field
//! - Several groups combine as a union

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::marker::PhantomData;

use crate::encoding::Fields;
use crate::profile::types::{json_kind, MappingError, Profile};

/// Converts profiles to and from their wire representation.
pub trait ProfileMapper<P>: Send + Sync {
    fn to_wire(&self, profile: &P, groups: &[&str]) -> Result<Fields, MappingError>;

    fn from_wire(&self, plain: Value, groups: &[&str]) -> Result<P, MappingError>;
}

/// Serialize any value into a top-level `Fields` document.
pub fn serialize_fields<T: Serialize + ?Sized>(value: &T) -> Result<Fields, MappingError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(Fields::from(map)),
        Ok(other) => Err(MappingError::NotAnObject(json_kind(&other))),
        Err(e) => Err(MappingError::Serialize(e.to_string())),
    }
}

/// Serde-backed mapper with per-group field allow-lists.
#[derive(Debug)]
pub struct GroupMapper<P> {
    groups: BTreeMap<String, Vec<String>>,
    _profile: PhantomData<fn() -> P>,
}

impl<P> GroupMapper<P> {
    /// A mapper that keeps every field for every group.
    pub fn new() -> Self {
        Self::with_groups(BTreeMap::new())
    }

    pub fn with_groups(groups: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            groups,
            _profile: PhantomData,
        }
    }

    fn filter(&self, map: Map<String, Value>, groups: &[&str]) -> Map<String, Value> {
        if groups.is_empty() {
            return map;
        }

        let mut allowed: HashSet<&str> = HashSet::new();
        for group in groups {
            match self.groups.get(*group) {
                Some(fields) => allowed.extend(fields.iter().map(String::as_str)),
                None => return map,
            }
        }

        map.into_iter()
            .filter(|(key, _)| allowed.contains(key.as_str()))
            .collect()
    }
}

impl<P> Default for GroupMapper<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Profile> ProfileMapper<P> for GroupMapper<P> {
    fn to_wire(&self, profile: &P, groups: &[&str]) -> Result<Fields, MappingError> {
        match serde_json::to_value(profile) {
            Ok(Value::Object(map)) => Ok(Fields::from(self.filter(map, groups))),
            Ok(other) => Err(MappingError::NotAnObject(json_kind(&other))),
            Err(e) => Err(MappingError::Serialize(e.to_string())),
        }
    }

    fn from_wire(&self, plain: Value, groups: &[&str]) -> Result<P, MappingError> {
        match plain {
            Value::Object(map) => serde_json::from_value(Value::Object(self.filter(map, groups)))
                .map_err(|e| MappingError::Deserialize(e.to_string())),
            other => Err(MappingError::NotAnObject(json_kind(&other))),
        }
    }
}
