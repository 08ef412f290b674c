//! Opaque pagination cursors
//!
//! A cursor is a small JSON record, base64 encoded with the URL-safe
//! alphabet so it can travel in query strings untouched:
//!
//! - `s`: absolute start offset (always present)
//! - `l`: page size override (optional)
//! - `t`: creation time boundary, RFC 3339 (optional)
//!
//! Absent optional fields are omitted rather than written as zero values.
//! Clients must treat the token as opaque.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Error decoding a cursor token
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    #[error("cursor is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("cursor payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("cursor payload is not a record")]
    NotARecord,
}

/// Decoded position in the creation order of items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cursor {
    #[serde(rename = "s")]
    pub start: u64,

    #[serde(rename = "l", default)]
    pub limit: Option<u32>,

    #[serde(rename = "t", default)]
    pub before: Option<DateTime<Utc>>,
}

impl Cursor {
    pub fn new(start: u64) -> Self {
        Self {
            start,
            limit: None,
            before: None,
        }
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_before(mut self, before: Option<DateTime<Utc>>) -> Self {
        self.before = before;
        self
    }

    /// Encode into an opaque, URL-safe token.
    pub fn encode(&self) -> String {
        let mut record = Map::new();
        record.insert("s".to_owned(), Value::from(self.start));
        if let Some(limit) = self.limit {
            record.insert("l".to_owned(), Value::from(limit));
        }
        if let Some(before) = self.before {
            record.insert(
                "t".to_owned(),
                Value::from(before.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            );
        }

        URL_SAFE.encode(Value::Object(record).to_string())
    }

    /// Decode a token produced by [`Cursor::encode`].
    ///
    /// Missing `s`, unknown keys, wrong types and non-object payloads are all
    /// rejected; nothing is defaulted except the optional fields.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE.decode(token)?;
        let value: Value = serde_json::from_slice(&bytes)?;
        if !value.is_object() {
            return Err(CursorError::NotARecord);
        }
        Ok(serde_json::from_value(value)?)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Cursor {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(json: &str) -> String {
        URL_SAFE.encode(json)
    }

    #[test]
    fn start_only_cursor_is_minimal() {
        let encoded = Cursor::new(3).encode();
        let raw = URL_SAFE.decode(&encoded).unwrap();
        assert_eq!(raw, br#"{"s":3}"#);
    }

    #[test]
    fn full_cursor_round_trips() {
        let before = DateTime::from_timestamp_micros(1_700_000_000_123_456).unwrap();
        let cursor = Cursor::new(40).with_limit(Some(10)).with_before(Some(before));

        assert_eq!(Cursor::decode(&cursor.encode()).unwrap(), cursor);
    }

    #[test]
    fn display_and_from_str_agree() {
        let cursor = Cursor::new(7).with_limit(Some(2));
        let parsed: Cursor = cursor.to_string().parse().unwrap();
        assert_eq!(parsed, cursor);
    }

    #[test]
    fn absent_optionals_decode_as_none() {
        let cursor = Cursor::decode(&token(r#"{"s":5}"#)).unwrap();
        assert_eq!(cursor.start, 5);
        assert_eq!(cursor.limit, None);
        assert_eq!(cursor.before, None);
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            Cursor::decode("not base64!").unwrap_err(),
            CursorError::Encoding(_)
        ));
    }

    #[test]
    fn rejects_non_json_payload() {
        assert!(matches!(
            Cursor::decode(&token("hello")).unwrap_err(),
            CursorError::Payload(_)
        ));
    }

    #[test]
    fn rejects_missing_start() {
        assert!(matches!(
            Cursor::decode(&token(r#"{"l":5}"#)).unwrap_err(),
            CursorError::Payload(_)
        ));
        assert!(Cursor::decode(&token("{}")).is_err());
    }

    #[test]
    fn rejects_garbled_fields() {
        assert!(Cursor::decode(&token(r#"{"s":-1}"#)).is_err());
        assert!(Cursor::decode(&token(r#"{"s":"1"}"#)).is_err());
        assert!(Cursor::decode(&token(r#"{"s":1,"t":"yesterday"}"#)).is_err());
        assert!(Cursor::decode(&token(r#"{"s":1,"x":2}"#)).is_err());
    }

    #[test]
    fn rejects_non_record_json() {
        assert!(matches!(
            Cursor::decode(&token("[1]")).unwrap_err(),
            CursorError::NotARecord
        ));
        assert!(matches!(
            Cursor::decode(&token("1")).unwrap_err(),
            CursorError::NotARecord
        ));
    }
}
