//! Multipart form encoding with PHP-style bracket names.
//!
//! A top-level call names fields with the bare key. A nested call wraps each
//! key as `[key]`, and the caller prepends its own name, so a doubly nested
//! value ends up as `outer[mid][leaf]`. List elements are addressed by index:
//! `tags[0]`, `items[1][id]`.

use crate::encoding::value::{FieldValue, Fields, FilePart};

/// Field appended to a tunneled PUT so the server treats the POST as a PUT.
pub const METHOD_OVERRIDE_FIELD: &str = "_method";

/// Top-level keys that mark a payload as carrying uploads.
const FILE_KEYS: [&str; 2] = ["file", "files"];

/// Value of a single multipart field.
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldValue {
    Text(String),
    File(FilePart),
}

/// A named multipart field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: FormFieldValue,
}

/// Ordered multipart body. Field names may repeat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    fields: Vec<FormField>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(FormField {
            name: name.into(),
            value: FormFieldValue::Text(value.into()),
        });
    }

    pub fn append_file(&mut self, name: impl Into<String>, file: FilePart) {
        self.fields.push(FormField {
            name: name.into(),
            value: FormFieldValue::File(file),
        });
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// First text value stored under `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|field| match &field.value {
            FormFieldValue::Text(text) if field.name == name => Some(text.as_str()),
            _ => None,
        })
    }

    /// First file stored under `name`.
    pub fn file(&self, name: &str) -> Option<&FilePart> {
        self.fields.iter().find_map(|field| match &field.value {
            FormFieldValue::File(file) if field.name == name => Some(file),
            _ => None,
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl IntoIterator for FormPayload {
    type Item = FormField;
    type IntoIter = std::vec::IntoIter<FormField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Whether the payload should travel as multipart.
///
/// Shallow and name-based: only top-level keys are checked, and the value
/// under the key is not inspected.
pub fn has_files(fields: &Fields) -> bool {
    fields.keys().any(|key| FILE_KEYS.contains(&key))
}

/// Flatten `fields` into multipart fields.
///
/// `nested` is true only for recursive calls; it wraps each produced key in
/// brackets so the parent can concatenate it onto its own name.
pub fn encode_form(fields: &Fields, nested: bool) -> FormPayload {
    let mut form = FormPayload::new();

    for (key, value) in fields.iter() {
        let name = if nested {
            format!("[{}]", key)
        } else {
            key.to_string()
        };
        append_value(&mut form, &name, value);
    }

    form
}

fn append_value(form: &mut FormPayload, name: &str, value: &FieldValue) {
    match value {
        FieldValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                append_value(form, &format!("{}[{}]", name, index), item);
            }
        }
        FieldValue::File(file) => form.append_file(name, file.clone()),
        FieldValue::Map(inner) => {
            for field in encode_form(inner, true) {
                form.fields.push(FormField {
                    name: format!("{}{}", name, field.name),
                    value: field.value,
                });
            }
        }
        FieldValue::Undefined | FieldValue::Null => {}
        FieldValue::Scalar(scalar) => form.append_text(name, scalar.to_string()),
    }
}
