//! Merging operator-supplied arguments into a stored job request.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::AugmentError;

/// The request field that carries extra command line arguments
pub const EXTRA_ARGS_KEY: &str = "extra_args";

/// Indentation used by the task queue when it stores requests
const REQUEST_INDENT: &[u8] = b"    ";

/// Decode a request payload into a JSON object
pub fn parse_request(payload: &str) -> Result<Map<String, Value>, AugmentError> {
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(AugmentError::MalformedPayload(format!(
            "expected an object, found {}",
            value_kind(&other)
        ))),
        Err(e) => Err(AugmentError::MalformedPayload(e.to_string())),
    }
}

/// Append `extra_args` to the request's `extra_args` field.
///
/// An empty `extra_args` returns the payload untouched. Otherwise the field is
/// created or extended (space separated) and the whole document re-serialized
/// with the remaining keys kept in their original order.
pub fn augment_request(payload: &str, extra_args: &str) -> Result<String, AugmentError> {
    let mut request = parse_request(payload)?;

    let extra_args = extra_args.trim();
    if extra_args.is_empty() {
        return Ok(payload.to_string());
    }

    let merged = match request.get(EXTRA_ARGS_KEY) {
        None => extra_args.to_string(),
        Some(Value::String(current)) if current.trim().is_empty() => extra_args.to_string(),
        Some(Value::String(current)) => format!("{} {}", current, extra_args),
        Some(other) => {
            return Err(AugmentError::InvalidFieldType {
                field: EXTRA_ARGS_KEY.to_string(),
                found: value_kind(other),
            })
        }
    };
    debug!("Merged {}: {}", EXTRA_ARGS_KEY, merged);

    request.insert(EXTRA_ARGS_KEY.to_string(), Value::String(merged));
    to_request_string(&request)
}

/// Read the `extra_args` field, if it is a string
pub fn current_extra_args(payload: &str) -> Result<Option<String>, AugmentError> {
    let request = parse_request(payload)?;
    match request.get(EXTRA_ARGS_KEY) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(AugmentError::InvalidFieldType {
            field: EXTRA_ARGS_KEY.to_string(),
            found: value_kind(other),
        }),
    }
}

fn to_request_string(request: &Map<String, Value>) -> Result<String, AugmentError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(REQUEST_INDENT));
    request
        .serialize(&mut ser)
        .map_err(|e| AugmentError::MalformedPayload(e.to_string()))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
