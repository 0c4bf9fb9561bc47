//! Declared key types and the coercion rules that canonicalize values for them.
//!
//! Coercion is total: every input value maps to either the canonical BSON
//! representation of the declared type or [`Bson::Null`]. It never fails, so
//! attribute assignment never fails on malformed input.
//!
//! | Key type              | Canonical value      |
//! |-----------------------|----------------------|
//! | [`KeyType::String`]   | `Bson::String`       |
//! | [`KeyType::Integer`]  | `Bson::Int64`        |
//! | [`KeyType::Float`]    | `Bson::Double`       |
//! | [`KeyType::Boolean`]  | `Bson::Boolean`      |
//! | [`KeyType::Time`]     | `Bson::DateTime`     |
//! | [`KeyType::ObjectId`] | `Bson::ObjectId` when the input is a 24-char hex string, otherwise unchanged |
//! | [`KeyType::Any`]      | unchanged            |

use bson::{Bson, DateTime, oid::ObjectId};
use chrono::{NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The semantic type a key is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// Text.
    String,
    /// 64-bit signed integer.
    Integer,
    /// True/false.
    Boolean,
    /// 64-bit float.
    Float,
    /// UTC instant with millisecond precision.
    Time,
    /// Document identifier. Generated identifiers are BSON object ids, but any
    /// caller-supplied scalar is kept as an opaque identifier.
    ObjectId,
    /// Opaque; values pass through unchanged.
    Any,
}

impl KeyType {
    /// Coerces `value` into the canonical representation of this type.
    ///
    /// `Null` always stays `Null`. Values that cannot be interpreted as this
    /// type degrade to `Null`.
    pub fn coerce(self, value: Bson) -> Bson {
        if matches!(value, Bson::Null | Bson::Undefined) {
            return Bson::Null;
        }

        let coerced = match self {
            KeyType::String => to_text(value).map(Bson::String),
            KeyType::Integer => to_integer(value).map(Bson::Int64),
            KeyType::Float => to_float(value).map(Bson::Double),
            KeyType::Boolean => to_boolean(value).map(Bson::Boolean),
            KeyType::Time => to_time(value).map(Bson::DateTime),
            KeyType::ObjectId => Some(to_identifier(value)),
            KeyType::Any => Some(value),
        };

        coerced.unwrap_or(Bson::Null)
    }

    /// Human-readable label of this type.
    pub fn label(self) -> &'static str {
        match self {
            KeyType::String => "String",
            KeyType::Integer => "Integer",
            KeyType::Boolean => "Boolean",
            KeyType::Float => "Float",
            KeyType::Time => "Time",
            KeyType::ObjectId => "ObjectId",
            KeyType::Any => "Any",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coerces `value` into the canonical representation of `key_type`.
pub fn coerce(value: impl Into<Bson>, key_type: KeyType) -> Bson {
    key_type.coerce(value.into())
}

fn to_text(value: Bson) -> Option<String> {
    match value {
        Bson::String(s) | Bson::Symbol(s) => Some(s),
        Bson::Int32(i) => Some(i.to_string()),
        Bson::Int64(i) => Some(i.to_string()),
        Bson::Double(f) => Some(f.to_string()),
        Bson::Boolean(b) => Some(b.to_string()),
        Bson::DateTime(dt) => format_time(dt),
        Bson::ObjectId(oid) => Some(oid.to_hex()),
        Bson::Null | Bson::Undefined => None,
        other => Some(other.to_string()),
    }
}

fn to_integer(value: Bson) -> Option<i64> {
    match value {
        Bson::Int32(i) => Some(i64::from(i)),
        Bson::Int64(i) => Some(i),
        Bson::Double(f) => truncate(f),
        Bson::Boolean(b) => Some(i64::from(b)),
        Bson::DateTime(dt) => Some(dt.timestamp_millis()),
        Bson::String(s) | Bson::Symbol(s) => parse_integer(&s),
        Bson::Decimal128(d) => parse_integer(&d.to_string()),
        _ => None,
    }
}

fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();

    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().and_then(truncate))
}

fn truncate(f: f64) -> Option<i64> {
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

fn to_float(value: Bson) -> Option<f64> {
    match value {
        Bson::Double(f) => Some(f),
        Bson::Int32(i) => Some(f64::from(i)),
        Bson::Int64(i) => Some(i as f64),
        Bson::Boolean(b) => Some(if b { 1.0 } else { 0.0 }),
        Bson::String(s) | Bson::Symbol(s) => s.trim().parse::<f64>().ok(),
        Bson::Decimal128(d) => d.to_string().parse::<f64>().ok(),
        _ => None,
    }
}

fn to_boolean(value: Bson) -> Option<bool> {
    match value {
        Bson::Boolean(b) => Some(b),
        Bson::Int32(i) => Some(i != 0),
        Bson::Int64(i) => Some(i != 0),
        Bson::Double(f) => Some(f != 0.0),
        Bson::String(s) | Bson::Symbol(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" | "on" => Some(true),
            "false" | "f" | "no" | "n" | "0" | "off" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn to_time(value: Bson) -> Option<DateTime> {
    match value {
        Bson::DateTime(dt) => Some(dt),
        Bson::Timestamp(ts) => Some(DateTime::from_millis(i64::from(ts.time) * 1000)),
        Bson::Int32(secs) => Some(DateTime::from_millis(i64::from(secs) * 1000)),
        Bson::Int64(secs) => secs.checked_mul(1000).map(DateTime::from_millis),
        Bson::String(s) | Bson::Symbol(s) => parse_time(&s),
        _ => None,
    }
}

fn parse_time(text: &str) -> Option<DateTime> {
    let text = text.trim();

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(DateTime::from_millis(dt.timestamp_millis()));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(DateTime::from_millis(naive.and_utc().timestamp_millis()));
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_millis(naive.and_utc().timestamp_millis()))
}

fn format_time(dt: DateTime) -> Option<String> {
    chrono::DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis())
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn to_identifier(value: Bson) -> Bson {
    match value {
        Bson::String(s) if s.len() == 24 => match ObjectId::parse_str(&s) {
            Ok(oid) => Bson::ObjectId(oid),
            Err(_) => Bson::String(s),
        },
        other => other,
    }
}
