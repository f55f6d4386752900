//! Field-by-field reader over a JSON object.
//!
//! Scalars and enums go through serde; nested records go through
//! [`FromFields`] so every error carries the full path to the bad value.
//! Keys that are never read are dropped.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::FieldError;

/// A record that can be read from an object.
pub trait FromFields: Sized {
    fn from_fields(fields: &Fields<'_>) -> Result<Self, FieldError>;

    /// Read a whole value, rejecting anything that is not an object.
    fn from_value(value: &Value) -> Result<Self, FieldError> {
        Self::from_fields(&Fields::new(value, "")?)
    }
}

pub struct Fields<'a> {
    map: &'a Map<String, Value>,
    prefix: String,
}

impl<'a> Fields<'a> {
    pub fn new(value: &'a Value, prefix: &str) -> Result<Self, FieldError> {
        match value {
            Value::Object(map) => Ok(Self {
                map,
                prefix: prefix.to_string(),
            }),
            other => Err(FieldError::new(
                if prefix.is_empty() { "(root)" } else { prefix },
                format!("expected an object, found {}", kind(other)),
            )),
        }
    }

    fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.prefix)
        }
    }

    fn decode<T: DeserializeOwned>(&self, key: &str, value: &Value) -> Result<T, FieldError> {
        serde_json::from_value(value.clone())
            .map_err(|e| FieldError::new(self.path(key), e.to_string()))
    }

    pub fn required<T: DeserializeOwned>(&self, key: &str) -> Result<T, FieldError> {
        match self.map.get(key) {
            Some(value) => self.decode(key, value),
            None => Err(FieldError::new(self.path(key), "required")),
        }
    }

    /// Absent keys yield `None`. An explicit `null` is a type error.
    pub fn optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, FieldError> {
        self.map
            .get(key)
            .map(|value| self.decode(key, value))
            .transpose()
    }

    pub fn or_default<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, FieldError> {
        Ok(self.optional(key)?.unwrap_or(default))
    }

    /// Optional list of nested records; items are addressed as `key[i]`.
    pub fn records<T: FromFields>(&self, key: &str) -> Result<Option<Vec<T>>, FieldError> {
        let Some(value) = self.map.get(key) else {
            return Ok(None);
        };
        let Value::Array(items) = value else {
            return Err(FieldError::new(
                self.path(key),
                format!("expected an array, found {}", kind(value)),
            ));
        };
        let base = self.path(key);
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::from_fields(&Fields::new(item, &format!("{base}[{i}]"))?))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Pair {
        a: String,
        b: Option<u32>,
    }

    impl FromFields for Pair {
        fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
            Ok(Self {
                a: f.required("a")?,
                b: f.optional("b")?,
            })
        }
    }

    #[test]
    fn missing_required_names_the_key() {
        let err = Pair::from_value(&json!({ "b": 1 })).err().unwrap();
        assert_eq!(err.path, "a");
        assert_eq!(err.message, "required");
    }

    #[test]
    fn null_is_not_absent() {
        let err = Pair::from_value(&json!({ "a": "x", "b": null })).err().unwrap();
        assert_eq!(err.path, "b");
    }

    #[test]
    fn nested_records_carry_index_paths() {
        let v = json!({ "items": [{ "a": "ok" }, { "a": 3 }] });
        let f = Fields::new(&v, "").unwrap();
        let err = f.records::<Pair>("items").err().unwrap();
        assert_eq!(err.path, "items[1].a");
    }

    #[test]
    fn non_objects_are_rejected() {
        let err = Pair::from_value(&json!([1, 2])).err().unwrap();
        assert_eq!(err.path, "(root)");
        assert!(err.message.contains("an array"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let p = Pair::from_value(&json!({ "a": "x", "zzz": true })).unwrap();
        assert_eq!(p.a, "x");
        assert_eq!(p.b, None);
    }
}
