//! Form validation shared by every content editor.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use url::Url;

pub const INVALID_URL_MESSAGE: &str = "Must be a valid http(s) URL";

/// Raw submitted form values keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    values: HashMap<String, String>,
}

impl FormFields {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All validation failures for one submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// First message reported for `field`, if any.
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Collects field values while accumulating every error.
pub struct Validator<'a> {
    fields: &'a FormFields,
    errors: FieldErrors,
}

impl<'a> Validator<'a> {
    pub fn new(fields: &'a FormFields) -> Self {
        Self {
            fields,
            errors: FieldErrors::default(),
        }
    }

    /// Trimmed non-empty text.
    pub fn required(&mut self, field: &'static str, message: &'static str) -> String {
        let value = self.fields.get(field).trim();
        if value.is_empty() {
            self.errors.push(field, message);
        }
        value.to_string()
    }

    /// Trimmed text; blank becomes `None`.
    pub fn optional(&mut self, field: &'static str) -> Option<String> {
        let value = self.fields.get(field).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Optional absolute `http`/`https` URL.
    pub fn optional_url(&mut self, field: &'static str) -> Option<String> {
        let value = self.optional(field)?;
        if is_http_url(&value) {
            Some(value)
        } else {
            self.errors.push(field, INVALID_URL_MESSAGE);
            None
        }
    }

    /// Comma-separated list; at least one entry.
    pub fn list(&mut self, field: &'static str, message: &'static str) -> Vec<String> {
        let items = parse_technologies(self.fields.get(field));
        if items.is_empty() {
            self.errors.push(field, message);
        }
        items
    }

    /// Checkbox state.
    pub fn flag(&self, field: &'static str) -> bool {
        matches!(self.fields.get(field).trim(), "on" | "true" | "1")
    }

    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

/// Split a comma-separated technology list, keeping the first occurrence of each entry.
pub fn parse_technologies(input: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for entry in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !items.iter().any(|existing| existing == entry) {
            items.push(entry.to_string());
        }
    }
    items
}

fn is_http_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}
