// SPDX-License-Identifier: GPL-3.0-or-later

//! Query-string encoding for request objects.
//!
//! Request structs are serialized with serde and flattened into
//! `(name, value)` pairs. Field names come from the serde name of each field.
//! Absent (`None`/null) fields, empty strings and empty sequences are left
//! out. A sequence of scalars becomes a repeated key
//! (`showids=1&showids=2`); its elements are sent as they are, so an empty
//! string element still yields `showids=`. Pairs are returned sorted by key.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryEncodeError {
    #[error("request must serialize to a struct or map, got {0}")]
    NotAStruct(&'static str),

    #[error("field `{0}` holds a nested object")]
    NestedObject(String),

    #[error("field `{0}` holds a nested sequence")]
    NestedSequence(String),

    #[error("request could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Flatten a request object into query pairs.
pub fn encode<Q>(request: &Q) -> Result<Vec<(String, String)>, QueryEncodeError>
where
    Q: Serialize + ?Sized,
{
    let fields = match serde_json::to_value(request)? {
        Value::Object(fields) => fields,
        Value::Null => return Ok(Vec::new()),
        other => return Err(QueryEncodeError::NotAStruct(kind(&other))),
    };

    let mut pairs = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Value::String(s) = item {
                        pairs.push((name.clone(), s));
                    } else if let Some(encoded) = scalar(&name, item)? {
                        pairs.push((name.clone(), encoded));
                    }
                }
            }
            other => {
                if let Some(encoded) = scalar(&name, other)? {
                    pairs.push((name, encoded));
                }
            }
        }
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(pairs)
}

fn scalar(name: &str, value: Value) -> Result<Option<String>, QueryEncodeError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) => Err(QueryEncodeError::NestedSequence(name.to_string())),
        Value::Object(_) => Err(QueryEncodeError::NestedObject(name.to_string())),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "an object",
    }
}
