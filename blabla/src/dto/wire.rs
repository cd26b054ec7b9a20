//! Codec plumbing shared by every DTO.
//!
//! Each DTO encodes itself with [`ToWire`] and decodes with [`FromWire`].
//! Decoding goes through [`WireObject`], a typed view over a JSON object that
//! turns absent keys and wrong JSON types into [`DecodeError`] values naming
//! the entity and key involved.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{DecodeError, DecodeResult};

/// Encode a DTO into its wire form. Never fails.
pub trait ToWire {
    fn to_wire(&self) -> Value;
}

/// Decode a DTO from its wire form.
pub trait FromWire: Sized {
    /// Entity name used in decode error messages.
    const ENTITY: &'static str;

    fn from_wire(value: &Value) -> DecodeResult<Self>;

    /// Parse JSON text, then decode it.
    fn from_json_str(json: &str) -> DecodeResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_wire(&value)
    }

    /// Decode a source that may be missing.
    ///
    /// Absent, null, falsy (`false`, `0`, `""`, `[]`, `{}`) and non-object
    /// sources yield `Ok(None)` without looking at any key.
    fn from_wire_opt(value: Option<&Value>) -> DecodeResult<Option<Self>> {
        match value {
            Some(v) if v.as_object().is_some_and(|map| !map.is_empty()) => {
                Self::from_wire(v).map(Some)
            }
            _ => Ok(None),
        }
    }
}

/// serde `deserialize_with` helper applying [`FromWire::from_wire_opt`].
///
/// `Option<T>` fields deserialize through serde's own `Option` handling,
/// which only maps null to `None`. Fields holding data that callers attach
/// conditionally (such as usage) use this instead, so an empty or falsy
/// value also becomes `None`:
///
/// ```ignore
/// #[serde(default, deserialize_with = "blabla::dto::wire::deserialize_opt")]
/// usage: Option<Usage>,
/// ```
pub fn deserialize_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromWire,
{
    let value = <Value as serde::Deserialize>::deserialize(deserializer)?;
    T::from_wire_opt(Some(&value)).map_err(serde::de::Error::custom)
}

/// Canonical wire form for timestamps.
pub(crate) fn timestamp_to_wire(ts: &DateTime<Utc>) -> Value {
    Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Encode an optional nested DTO, null when absent.
pub(crate) fn optional_to_wire<T: ToWire>(value: Option<&T>) -> Value {
    value.map_or(Value::Null, ToWire::to_wire)
}

/// Typed read access to the keys of one wire object.
pub struct WireObject<'a> {
    entity: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> WireObject<'a> {
    pub fn new(entity: &'static str, value: &'a Value) -> DecodeResult<Self> {
        match value {
            Value::Object(map) => Ok(Self { entity, map }),
            _ => Err(DecodeError::NotAnObject { entity }),
        }
    }

    /// The value under `key`, treating an explicit null as absent.
    pub fn get(&self, key: &'static str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    pub fn required(&self, key: &'static str) -> DecodeResult<&'a Value> {
        self.get(key).ok_or(DecodeError::MissingKey {
            entity: self.entity,
            key,
        })
    }

    fn invalid_type(&self, key: &'static str, expected: &'static str) -> DecodeError {
        DecodeError::InvalidType {
            entity: self.entity,
            key,
            expected,
        }
    }

    pub fn str(&self, key: &'static str) -> DecodeResult<String> {
        self.required(key)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.invalid_type(key, "a string"))
    }

    pub fn opt_str(&self, key: &'static str) -> DecodeResult<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| self.invalid_type(key, "a string or null")),
        }
    }

    pub fn i64(&self, key: &'static str) -> DecodeResult<i64> {
        self.required(key)?
            .as_i64()
            .ok_or_else(|| self.invalid_type(key, "an integer"))
    }

    pub fn opt_i64(&self, key: &'static str) -> DecodeResult<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.invalid_type(key, "an integer or null")),
        }
    }

    pub fn u64(&self, key: &'static str) -> DecodeResult<u64> {
        self.required(key)?
            .as_u64()
            .ok_or_else(|| self.invalid_type(key, "a non-negative integer"))
    }

    pub fn uuid(&self, key: &'static str) -> DecodeResult<Uuid> {
        let raw = self.str(key)?;
        Uuid::parse_str(&raw).map_err(|source| DecodeError::InvalidUuid {
            entity: self.entity,
            key,
            source,
        })
    }

    pub fn timestamp(&self, key: &'static str) -> DecodeResult<DateTime<Utc>> {
        let raw = self.str(key)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|source| DecodeError::InvalidTimestamp {
                entity: self.entity,
                key,
                source,
            })
    }

    pub fn array(&self, key: &'static str) -> DecodeResult<&'a Vec<Value>> {
        self.required(key)?
            .as_array()
            .ok_or_else(|| self.invalid_type(key, "an array"))
    }

    /// Decode a required nested DTO.
    pub fn nested<T: FromWire>(&self, key: &'static str) -> DecodeResult<T> {
        T::from_wire(self.required(key)?)
    }

    /// Decode an optional nested DTO; absent or null gives `None`.
    pub fn opt_nested<T: FromWire>(&self, key: &'static str) -> DecodeResult<Option<T>> {
        self.get(key).map(T::from_wire).transpose()
    }
}

/// Implement `serde::Serialize` in terms of [`ToWire`].
macro_rules! wire_serialize {
    ($($ty:ty),+ $(,)?) => {$(
        impl ::serde::Serialize for $ty {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::core::result::Result<S::Ok, S::Error> {
                let wire = $crate::dto::wire::ToWire::to_wire(self);
                ::serde::Serialize::serialize(&wire, serializer)
            }
        }
    )+};
}

/// Implement `serde::Deserialize` in terms of [`FromWire`].
macro_rules! wire_deserialize {
    ($($ty:ty),+ $(,)?) => {$(
        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::core::result::Result<Self, D::Error> {
                let value = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                <$ty as $crate::dto::wire::FromWire>::from_wire(&value)
                    .map_err(::serde::de::Error::custom)
            }
        }
    )+};
}

pub(crate) use wire_deserialize;
pub(crate) use wire_serialize;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_counts_as_missing() {
        let value = json!({"a": null});
        let obj = WireObject::new("Test", &value).unwrap();
        let err = obj.str("a").unwrap_err();
        assert!(matches!(err, DecodeError::MissingKey { key: "a", .. }));
        assert_eq!(obj.opt_str("a").unwrap(), None);
    }

    #[test]
    fn wrong_type_is_reported() {
        let value = json!({"n": "seven"});
        let obj = WireObject::new("Test", &value).unwrap();
        let err = obj.i64("n").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidType {
                key: "n",
                expected: "an integer",
                ..
            }
        ));
    }

    #[test]
    fn non_object_is_rejected() {
        let value = json!([1, 2]);
        assert!(matches!(
            WireObject::new("Test", &value),
            Err(DecodeError::NotAnObject { entity: "Test" })
        ));
    }

    #[test]
    fn timestamp_accepts_offsets_and_normalizes_to_utc() {
        let value = json!({"at": "2024-05-01T12:00:00+02:00"});
        let obj = WireObject::new("Test", &value).unwrap();
        let ts = obj.timestamp("at").unwrap();
        assert_eq!(timestamp_to_wire(&ts), json!("2024-05-01T10:00:00Z"));
    }
}
