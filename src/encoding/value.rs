//! Value types accepted by the request encoders.
//!
//! Two bag types exist because the two verb families accept different shapes:
//! - [`ParamBag`] is flat (scalars and scalar lists) and becomes a query string
//! - [`Fields`] nests arbitrarily and may carry files; it becomes a JSON or
//!   multipart body

use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::Path;

/// A primitive request value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    /// Unsigned integers beyond `i64::MAX`, or from unsigned call-site types.
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn from_json_number(number: &Number) -> Self {
        number
            .as_i64()
            .map(Scalar::Int)
            .or_else(|| number.as_u64().map(Scalar::UInt))
            .or_else(|| number.as_f64().map(Scalar::Float))
            .unwrap_or_else(|| Scalar::Str(number.to_string()))
    }

    fn to_json(&self) -> Value {
        match self {
            Scalar::Str(s) => Value::String(s.clone()),
            Scalar::Int(i) => Value::Number((*i).into()),
            Scalar::UInt(u) => Value::Number((*u).into()),
            Scalar::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            Scalar::Bool(b) => Value::Bool(*b),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::UInt(u) => write!(f, "{}", u),
            Scalar::Float(x) => write_float(f, *x),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Non-finite values render as `Infinity` / `NaN`; magnitudes outside
/// `[1e-6, 1e21)` use exponent form (`1e+21`, `1e-7`).
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("NaN");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if x == 0.0 {
        return f.write_str("0");
    }

    let magnitude = x.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return write!(f, "{}", x);
    }

    let exponent = format!("{:e}", x);
    match exponent.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => write!(f, "{}e+{}", mantissa, power),
        _ => f.write_str(&exponent),
    }
}

/// A value in a [`ParamBag`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Key is dropped from the encoded query.
    Undefined,
    /// Key is sent with an empty value.
    Null,
    Scalar(Scalar),
    List(Vec<Scalar>),
}

/// A value in a [`Fields`] document.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Undefined,
    Null,
    Scalar(Scalar),
    File(FilePart),
    List(Vec<FieldValue>),
    Map(Fields),
}

impl FieldValue {
    /// JSON form of the value. Files collapse to their file name.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Undefined | FieldValue::Null => Value::Null,
            FieldValue::Scalar(scalar) => scalar.to_json(),
            FieldValue::File(file) => Value::String(file.file_name().to_string()),
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
            FieldValue::Map(fields) => fields.to_json(),
        }
    }
}

macro_rules! impl_scalar_conversions {
    ($($ty:ty => |$value:ident| $scalar:expr),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from($value: $ty) -> Self {
                    $scalar
                }
            }

            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::Scalar(value.into())
                }
            }

            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Scalar(value.into())
                }
            }
        )*
    };
}

impl_scalar_conversions!(
    String => |value| Scalar::Str(value),
    &str => |value| Scalar::Str(value.to_string()),
    i32 => |value| Scalar::Int(value.into()),
    i64 => |value| Scalar::Int(value),
    u32 => |value| Scalar::Int(value.into()),
    u64 => |value| Scalar::UInt(value),
    usize => |value| Scalar::UInt(value as u64),
    // Widening an f32 exposes binary noise (0.1 → 0.10000000149011612); go
    // through its shortest decimal form instead.
    f32 => |value| Scalar::Float(value.to_string().parse().unwrap_or(f64::from(value))),
    f64 => |value| Scalar::Float(value),
    bool => |value| Scalar::Bool(value),
);

impl<T: Into<Scalar>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ParamValue::Undefined)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Undefined)
    }
}

impl From<Fields> for FieldValue {
    fn from(fields: Fields) -> Self {
        FieldValue::Map(fields)
    }
}

impl From<FilePart> for FieldValue {
    fn from(file: FilePart) -> Self {
        FieldValue::File(file)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => FieldValue::Scalar(Scalar::from_json_number(&n)),
            Value::String(s) => FieldValue::Scalar(Scalar::Str(s)),
            Value::Array(items) => FieldValue::List(items.into_iter().map(FieldValue::from).collect()),
            Value::Object(map) => FieldValue::Map(Fields::from(map)),
        }
    }
}

/// Flat key/value input for query-string verbs (GET, DELETE).
///
/// Keys are unique; re-inserting a key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamBag {
    entries: Vec<(String, ParamValue)>,
}

impl ParamBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        insert_ordered(&mut self.entries, key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Mark a key as explicitly cleared.
    pub fn with_null(self, key: impl Into<String>) -> Self {
        self.with(key, ParamValue::Null)
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParamBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = ParamBag::new();
        for (key, value) in iter {
            bag.insert(key, value);
        }
        bag
    }
}

/// Values outside the bag's vocabulary (nested objects, nested arrays) are
/// passed through as their JSON text.
impl From<Map<String, Value>> for ParamBag {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::Null => ParamValue::Null,
                    Value::Array(items) => ParamValue::List(items.iter().map(json_list_item).collect()),
                    other => ParamValue::Scalar(json_list_item(&other)),
                };
                (key, value)
            })
            .collect()
    }
}

fn json_list_item(value: &Value) -> Scalar {
    match value {
        Value::Bool(b) => Scalar::Bool(*b),
        Value::Number(n) => Scalar::from_json_number(n),
        Value::String(s) => Scalar::Str(s.clone()),
        other => Scalar::Str(other.to_string()),
    }
}

/// Ordered, nestable document for body verbs (POST, PUT).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, FieldValue)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        insert_ordered(&mut self.entries, key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Overlay every field of `other`, replacing existing keys.
    pub fn merge(&mut self, other: Fields) {
        for (key, value) in other.entries {
            insert_ordered(&mut self.entries, key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON object form. `Undefined` fields are left out.
    pub fn to_json(&self) -> Value {
        let map = self
            .entries
            .iter()
            .filter(|(_, v)| !matches!(v, FieldValue::Undefined))
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect::<Map<String, Value>>();
        Value::Object(map)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl From<Map<String, Value>> for Fields {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

fn insert_ordered<V>(entries: &mut Vec<(String, V)>, key: String, value: V) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => entries.push((key, value)),
    }
}

/// An uploadable file: raw bytes plus the name reported to the server.
#[derive(Clone, PartialEq)]
pub struct FilePart {
    file_name: String,
    bytes: Vec<u8>,
    mime_type: Option<String>,
}

impl FilePart {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Read a file from disk, naming the part after the path's final component.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Split into `(file_name, bytes, mime_type)`.
    pub fn into_parts(self) -> (String, Vec<u8>, Option<String>) {
        (self.file_name, self.bytes, self.mime_type)
    }
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}
