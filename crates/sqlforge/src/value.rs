//! Loosely typed input values and their coercion into typed parameters.
//!
//! Callers hand in a [`Value`] (anything convertible via `Into<Value>`); the
//! [`Coercer`] turns it into a [`PreparedValue`] for the field's
//! [`SemanticType`]. Integer and boolean coercion are lenient (unparseable
//! text becomes `0` / `false`), while date and float coercion fail with
//! [`BuildError::Format`]. [`Value::Null`] coerces to [`PreparedValue::Null`]
//! for every type and is bound as SQL `NULL`.

use crate::config::BuilderConfig;
use crate::error::{BuildError, BuildResult};
use crate::field::SemanticType;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A caller-supplied value before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
}

impl Value {
    /// Textual form used by the parsing fallbacks.
    fn text(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Int(n) => Cow::Owned(n.to_string()),
            Value::Float(n) => Cow::Owned(n.to_string()),
            Value::Text(s) => Cow::Borrowed(s),
            Value::DateTime(dt) => Cow::Owned(dt.to_rfc3339()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "string",
            Value::DateTime(_) => "datetime",
        }
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(dt: DateTime<Tz>) -> Self {
        Value::DateTime(dt.with_timezone(&Utc))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt.and_utc())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::DateTime(d.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Text(other.to_string()),
        }
    }
}

/// Build a `Vec<Value>` from heterogeneous values.
///
/// # Example
/// ```ignore
/// builder.insert(sqlforge::values!["Alice", 30, true])?;
/// ```
#[macro_export]
macro_rules! values {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::Value::from($value)),*]
    };
}

/// A coerced value tagged with the semantic type used to bind or inline it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum PreparedValue {
    /// SQL `NULL` for a field of the given type.
    Null(SemanticType),
    FilteredString(String),
    RawString(String),
    Text(String),
    Integer(i64),
    Boolean(bool),
    /// Unix timestamp in seconds.
    Date(i64),
    Float(f64),
}

impl PreparedValue {
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            PreparedValue::Null(ty) => *ty,
            PreparedValue::FilteredString(_) => SemanticType::FilteredString,
            PreparedValue::RawString(_) => SemanticType::RawString,
            PreparedValue::Text(_) => SemanticType::Text,
            PreparedValue::Integer(_) => SemanticType::Integer,
            PreparedValue::Boolean(_) => SemanticType::Boolean,
            PreparedValue::Date(_) => SemanticType::Date,
            PreparedValue::Float(_) => SemanticType::Float,
        }
    }

    /// The string payload of a string-family value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PreparedValue::FilteredString(s)
            | PreparedValue::RawString(s)
            | PreparedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload of an integer or date value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PreparedValue::Integer(n) | PreparedValue::Date(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PreparedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PreparedValue::Null(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PreparedValue::Float(n) => Some(*n),
            _ => None,
        }
    }
}

/// Converts [`Value`]s into [`PreparedValue`]s using a builder's configuration.
#[derive(Debug, Clone, Copy)]
pub struct Coercer<'a> {
    config: &'a BuilderConfig,
}

impl<'a> Coercer<'a> {
    pub fn new(config: &'a BuilderConfig) -> Self {
        Self { config }
    }

    /// Coerce `value` into the canonical form of `ty`.
    pub fn coerce(&self, ty: SemanticType, value: Value) -> BuildResult<PreparedValue> {
        if matches!(value, Value::Null) {
            return Ok(PreparedValue::Null(ty));
        }
        Ok(match ty {
            SemanticType::RawString => PreparedValue::RawString(expect_string(ty, value)?),
            SemanticType::FilteredString => {
                let s = expect_string(ty, value)?;
                PreparedValue::FilteredString(self.config.string_filter.filter(&s))
            }
            SemanticType::Text => {
                let s = expect_string(ty, value)?;
                PreparedValue::Text(self.config.text_filter.filter(&s))
            }
            SemanticType::Integer => PreparedValue::Integer(coerce_int(&value)),
            SemanticType::Boolean => PreparedValue::Boolean(coerce_bool(&value)),
            SemanticType::Date => PreparedValue::Date(self.coerce_date(&value)?),
            SemanticType::Float => PreparedValue::Float(coerce_float(&value)?),
        })
    }

    fn coerce_date(&self, value: &Value) -> BuildResult<i64> {
        match value {
            Value::Int(n) => Ok(*n),
            Value::DateTime(dt) => Ok(dt.timestamp()),
            Value::Text(s) => parse_date(s, &self.config.date_format),
            other => Err(BuildError::format(format!(
                "Cannot coerce {} to a date",
                other.kind()
            ))),
        }
    }
}

fn expect_string(ty: SemanticType, value: Value) -> BuildResult<String> {
    match value {
        Value::Text(s) => Ok(s),
        other => Err(BuildError::format(format!(
            "Expected a string for %{} field, got {}",
            ty.code(),
            other.kind()
        ))),
    }
}

fn coerce_int(value: &Value) -> i64 {
    match value {
        Value::Int(n) => *n,
        other => other.text().parse().unwrap_or(0),
    }
}

fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        other => other.text().eq_ignore_ascii_case("true"),
    }
}

/// Only finite floats are accepted; `inf` and `NaN` have no SQL literal.
fn coerce_float(value: &Value) -> BuildResult<f64> {
    let n = match value {
        Value::Float(n) => *n,
        other => {
            let text = other.text();
            text.trim()
                .parse()
                .map_err(|_| BuildError::format(format!("Cannot parse '{text}' as a float")))?
        }
    };
    if n.is_finite() {
        Ok(n)
    } else {
        Err(BuildError::format(format!("Float value {n} is not finite")))
    }
}

/// Parse `text` with a chrono pattern into Unix seconds (UTC).
///
/// Patterns with time fields parse as a date-time; date-only patterns resolve
/// to midnight.
fn parse_date(text: &str, format: &str) -> BuildResult<i64> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
        return Ok(dt.and_utc().timestamp());
    }
    NaiveDate::parse_from_str(text, format)
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc().timestamp())
        .map_err(|e| {
            BuildError::format(format!(
                "Cannot parse '{text}' as a date with format '{format}': {e}"
            ))
        })
}
