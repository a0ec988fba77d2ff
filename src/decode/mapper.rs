//! Mapping functions
//!
//! Each function takes ownership of the response body and either returns the
//! typed value or a `MalformedResponse` naming the record kind.

use super::types::Record;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Map a JSON value into `T`, reporting failures against `kind`
pub fn record<T: DeserializeOwned>(kind: &str, value: Value) -> Result<T> {
    T::deserialize(value).map_err(|e| Error::malformed(kind, e.to_string()))
}

/// Map a JSON value into a [`Record`]
pub fn decode<T: Record>(value: Value) -> Result<T> {
    record(T::KIND, value)
}

/// Map a JSON array into a list of records.
///
/// The failing element's index is included in the error.
pub fn decode_list<T: Record>(value: Value) -> Result<Vec<T>> {
    let Value::Array(items) = value else {
        return Err(Error::malformed(
            T::KIND,
            format!("expected a list, found {}", type_name(&value)),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            T::deserialize(item)
                .map_err(|e| Error::malformed(T::KIND, format!("item {index}: {e}")))
        })
        .collect()
}

/// Extract the identifier a create endpoint returns, e.g. `source_id`.
///
/// Numeric ids are accepted and rendered as strings.
pub fn id_field(kind: &str, value: &Value, key: &str) -> Result<String> {
    match value.get(key) {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        Some(other) => Err(Error::malformed(
            kind,
            format!("`{key}` must be a non-empty string, found {}", type_name(other)),
        )),
        None => Err(Error::malformed(kind, format!("missing field `{key}`"))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
