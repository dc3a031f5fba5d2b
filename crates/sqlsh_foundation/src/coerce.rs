//! Best-effort conversion of textual input into typed values.
//!
//! Every function maps `None` to [`Value::Null`]. Numeric conversions parse
//! the longest leading numeric prefix of the trimmed input and fall back to
//! zero when there is none, so `"j133"` becomes `0` rather than an error.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::SqlType;
use crate::value::Value;

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Coerces text to an integer.
#[must_use]
pub fn as_integer(text: Option<&str>) -> Value {
    match text {
        None | Some("") => Value::Null,
        Some(s) => Value::Integer(leading_integer(s).unwrap_or(0)),
    }
}

/// Coerces text to a float.
#[must_use]
pub fn as_float(text: Option<&str>) -> Value {
    match text {
        None | Some("") => Value::Null,
        Some(s) => Value::Float(leading_float(s).unwrap_or(0.0)),
    }
}

/// Coerces text to text.
#[must_use]
pub fn as_text(text: Option<&str>) -> Value {
    text.map_or(Value::Null, |s| Value::Text(s.to_owned()))
}

/// Coerces `t`/`T` to true and `f`/`F` to false; anything else is null.
#[must_use]
pub fn as_boolean(text: Option<&str>) -> Value {
    match text {
        Some("t" | "T") => Value::Boolean(true),
        Some("f" | "F") => Value::Boolean(false),
        _ => Value::Null,
    }
}

/// Coerces text to a time of day.
#[must_use]
pub fn as_time(text: Option<&str>) -> Value {
    let Some(s) = non_blank(text) else {
        return Value::Null;
    };
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        .map_or(Value::Null, Value::Time)
}

/// Coerces text to a timestamp. A bare date is taken as midnight.
#[must_use]
pub fn as_timestamp(text: Option<&str>) -> Value {
    let Some(s) = non_blank(text) else {
        return Value::Null;
    };
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_or(Value::Null, Value::Timestamp)
}

/// Coerces text to a calendar date.
#[must_use]
pub fn as_date(text: Option<&str>) -> Value {
    let Some(s) = non_blank(text) else {
        return Value::Null;
    };
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_or(Value::Null, Value::Date)
}

/// Coerces text according to a declared column type.
#[must_use]
pub fn coerce_as(ty: SqlType, text: Option<&str>) -> Value {
    match ty {
        SqlType::Integer => as_integer(text),
        SqlType::Float => as_float(text),
        SqlType::Text => as_text(text),
        SqlType::Boolean => as_boolean(text),
        SqlType::Time => as_time(text),
        SqlType::Timestamp => as_timestamp(text),
        SqlType::Date => as_date(text),
    }
}

/// Parses the longest leading integer of the trimmed input.
///
/// Returns `None` when the input has no leading digits. Values that overflow
/// `i64` saturate.
#[must_use]
pub fn leading_integer(text: &str) -> Option<i64> {
    let s = text.trim();
    let bytes = s.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[sign_len..]);
    if digits == 0 {
        return None;
    }
    let prefix = &s[..sign_len + digits];
    Some(prefix.parse().unwrap_or(if prefix.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

/// Parses the longest leading float literal of the trimmed input.
#[must_use]
pub fn leading_float(text: &str) -> Option<f64> {
    let s = text.trim();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if frac_digits > 0 || int_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|s| !s.is_empty())
}
