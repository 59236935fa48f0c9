//! Field-level access to LNURL response bodies.
//!
//! Lookups never fail on a missing field: they return `None` and leave it to the caller to
//! decide whether absence is an error. Values are coerced the way LNURL services in the wild
//! encode them, e.g. amounts sent as decimal strings.

use serde_json::{Map, Value};

use super::error::{LnurlError, LnurlResult};

pub struct JsonReader {
    fields: Map<String, Value>,
}

impl JsonReader {
    /// Parses `body` as a JSON object.
    pub fn parse(body: &str) -> LnurlResult<Self> {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(fields)) => Ok(Self { fields }),
            Ok(_) => Err(LnurlError::InvalidResponse(
                "response body is not a JSON object".to_string(),
            )),
            Err(e) => Err(LnurlError::InvalidResponse(e.to_string())),
        }
    }

    /// String value of a field. Numbers and booleans are rendered as text.
    pub fn string(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Unsigned integer value of a field.
    ///
    /// Returns `Some(Err(_))` when the field is present but is not a non-negative integer.
    pub fn u64(&self, name: &str) -> Option<Result<u64, String>> {
        let value = self.fields.get(name).filter(|v| !v.is_null())?;
        Some(match value {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| format!("{n} is not a non-negative integer")),
            Value::String(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("{s:?} is not a non-negative integer")),
            other => Err(format!("expected an integer, got {other}")),
        })
    }

    /// Boolean value of a field. `"true"`/`"false"` strings are accepted.
    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.fields.get(name)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

/// Helpers that turn an absent or malformed field into the matching [`LnurlError`] for the
/// subprotocol being parsed.
pub(crate) struct FieldReader<'a> {
    pub(crate) tag: &'a str,
    pub(crate) json: &'a JsonReader,
}

impl FieldReader<'_> {
    pub(crate) fn required_string(&self, name: &str) -> LnurlResult<String> {
        self.json
            .string(name)
            .ok_or_else(|| LnurlError::missing_field(self.tag, name))
    }

    pub(crate) fn required_u64(&self, name: &str) -> LnurlResult<u64> {
        self.optional_u64(name)?
            .ok_or_else(|| LnurlError::missing_field(self.tag, name))
    }

    pub(crate) fn optional_u64(&self, name: &str) -> LnurlResult<Option<u64>> {
        self.json
            .u64(name)
            .transpose()
            .map_err(|reason| LnurlError::invalid_field(self.tag, name, reason))
    }

    /// A required field holding an absolute URL.
    pub(crate) fn required_url(&self, name: &str) -> LnurlResult<String> {
        let value = self.required_string(name)?;
        url::Url::parse(&value)
            .map_err(|e| LnurlError::invalid_field(self.tag, name, e.to_string()))?;
        Ok(value)
    }
}
