use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A value that could not be decoded from its raw query form.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed query parameter value: {0:?}")]
    Malformed(String),
}

/// Translation between a binding's value type and its raw query form.
///
/// `encode` returns `None` when the value has no query representation
/// at all (a nullish value, or a float that cannot round-trip such as
/// `NaN`); the write path treats that as "unset". Implementations must
/// keep the round-trip law: `decode(encode(v))` yields a value equal to
/// `v` for every representable `v`, and encoding the default value is
/// stable across repeated calls.
pub trait Codec<T>: Send + Sync {
    fn encode(&self, value: &T) -> Option<String>;
    fn decode(&self, raw: &str) -> Result<T, DecodeError>;
}

/// The default codec.
///
/// Plain strings pass through as their literal form; every other value
/// is compact JSON. Decoding attempts JSON first and then falls back to
/// absorbing the raw string, so string-typed keys bypass structured
/// decoding entirely.
///
/// # Examples
///
/// ```
/// use urlstate::{Codec, JsonCodec};
///
/// assert_eq!(JsonCodec.encode(&42), Some("42".to_string()));
/// assert_eq!(JsonCodec.encode(&true), Some("true".to_string()));
/// assert_eq!(JsonCodec.encode(&"plain".to_string()), Some("plain".to_string()));
///
/// let n: i64 = JsonCodec.decode("42").unwrap();
/// assert_eq!(n, 42);
/// let s: String = JsonCodec.decode("not json at all").unwrap();
/// assert_eq!(s, "not json at all");
/// ```
pub struct JsonCodec;

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    fn encode(&self, value: &T) -> Option<String> {
        // serde_json renders non-finite floats as null, which lands on
        // the same "no representation" path as a genuine None.
        match serde_json::to_value(value) {
            Ok(Value::Null) => None,
            Ok(Value::String(s)) => Some(s),
            Ok(other) => Some(other.to_string()),
            Err(_) => None,
        }
    }

    fn decode(&self, raw: &str) -> Result<T, DecodeError> {
        if let Ok(value) = serde_json::from_str(raw) {
            return Ok(value);
        }
        serde_json::from_value(Value::String(raw.to_string()))
            .map_err(|_| DecodeError::Malformed(raw.to_string()))
    }
}
