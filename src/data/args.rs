//! Typed access to the loosely typed argument bundles sent over the bridge.
//!
//! Every accessor names the offending key in its error so the host sees which
//! argument was rejected. A JSON `null` is treated the same as a missing key.

use serde_json::{Map, Value};

use crate::{
    core::geo::LatLng,
    Error, Result,
};

/// Borrowed view over one argument object.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Args<'a> {
    /// Wraps `value`, which must be a JSON object.
    pub fn new(value: &'a Value) -> Result<Self> {
        value
            .as_object()
            .map(|map| Self { map })
            .ok_or_else(|| Error::Argument(format!("expected an argument map, got {value}")))
    }

    /// Raw value for `key`, `None` when missing or null.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    /// Raw value for `key`, failing when missing or null.
    pub fn value(&self, key: &str) -> Result<&'a Value> {
        self.get(key)
            .ok_or_else(|| Error::Argument(format!("missing required argument `{key}`")))
    }

    fn mismatch(key: &str, expected: &str, value: &Value) -> Error {
        Error::Argument(format!("`{key}` must be {expected}, got {value}"))
    }

    pub fn str(&self, key: &str) -> Result<&'a str> {
        let value = self.value(key)?;
        value
            .as_str()
            .ok_or_else(|| Self::mismatch(key, "a string", value))
    }

    pub fn opt_str(&self, key: &str) -> Result<Option<&'a str>> {
        self.get(key)
            .map(|value| {
                value
                    .as_str()
                    .ok_or_else(|| Self::mismatch(key, "a string", value))
            })
            .transpose()
    }

    pub fn f64(&self, key: &str) -> Result<f64> {
        let value = self.value(key)?;
        value
            .as_f64()
            .ok_or_else(|| Self::mismatch(key, "a number", value))
    }

    pub fn opt_f64(&self, key: &str) -> Result<Option<f64>> {
        self.get(key)
            .map(|value| {
                value
                    .as_f64()
                    .ok_or_else(|| Self::mismatch(key, "a number", value))
            })
            .transpose()
    }

    pub fn f64_or(&self, key: &str, default: f64) -> Result<f64> {
        Ok(self.opt_f64(key)?.unwrap_or(default))
    }

    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_bool()
                .ok_or_else(|| Self::mismatch(key, "a boolean", value)),
        }
    }

    pub fn list(&self, key: &str) -> Result<&'a [Value]> {
        let value = self.value(key)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| Self::mismatch(key, "a list", value))
    }

    /// Byte payloads arrive as a list of integers in `0..=255`.
    pub fn bytes(&self, key: &str) -> Result<Vec<u8>> {
        self.list(key)?
            .iter()
            .map(|byte| {
                byte.as_u64()
                    .and_then(|byte| u8::try_from(byte).ok())
                    .ok_or_else(|| Self::mismatch(key, "a list of bytes", byte))
            })
            .collect()
    }

    pub fn lat_lng(&self, key: &str) -> Result<LatLng> {
        LatLng::from_wire(self.value(key)?)
    }
}
