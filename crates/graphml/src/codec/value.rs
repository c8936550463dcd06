//! Typed value codec.
//!
//! Converts between the text of a `<data>` (or `<default>`) element and a
//! typed [`Value`], driven by the declared [`ValueType`] of its key. XML
//! escaping is not handled here; the XML layer owns it.

use std::borrow::Cow;
use std::ops::Neg;
use std::str::FromStr;

use crate::error::ValueError;
use crate::model::{Value, ValueType};

// =============================================================================
// DECODING
// =============================================================================

/// Decodes attribute text into a value of the declared type.
///
/// Non-string text is stripped of surrounding XML whitespace first; string
/// text is kept byte-exact.
pub fn decode_value(text: &str, value_type: ValueType) -> Result<Value, ValueError> {
    let trimmed = trim_xml_whitespace(text);
    let mismatch = || ValueError::TypeMismatch {
        expected: value_type,
        raw: text.to_string(),
    };

    match value_type {
        ValueType::Boolean => decode_bool(trimmed).map(Value::Boolean).ok_or_else(mismatch),
        ValueType::Int => trimmed.parse().map(Value::Int).map_err(|_| mismatch()),
        ValueType::Long => trimmed.parse().map(Value::Long).map_err(|_| mismatch()),
        ValueType::Float => decode_float(trimmed, f32::INFINITY, f32::NAN)
            .map(Value::Float)
            .ok_or_else(mismatch),
        ValueType::Double => decode_float(trimmed, f64::INFINITY, f64::NAN)
            .map(Value::Double)
            .ok_or_else(mismatch),
        ValueType::String => Ok(Value::String(text.to_string())),
    }
}

/// Parses `true`/`false` (any case) or `1`/`0`.
pub(crate) fn decode_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") || s == "1" {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") || s == "0" {
        Some(false)
    } else {
        None
    }
}

/// Parses decimal/exponential text plus the XML Schema special values.
fn decode_float<T>(s: &str, infinity: T, nan: T) -> Option<T>
where
    T: FromStr + Neg<Output = T>,
{
    match s {
        "INF" | "+INF" => Some(infinity),
        "-INF" => Some(-infinity),
        "NaN" => Some(nan),
        _ => s.parse().ok(),
    }
}

fn trim_xml_whitespace(s: &str) -> &str {
    s.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a value as canonical text for the declared type.
///
/// Fails if the value's own type differs from `value_type`.
pub fn encode_value(value: &Value, value_type: ValueType) -> Result<Cow<'_, str>, ValueError> {
    if value.value_type() != value_type {
        return Err(ValueError::WrongVariant {
            expected: value_type,
            found: value.value_type(),
        });
    }

    Ok(match value {
        Value::Boolean(v) => Cow::Borrowed(if *v { "true" } else { "false" }),
        Value::Int(v) => Cow::Owned(v.to_string()),
        Value::Long(v) => Cow::Owned(v.to_string()),
        Value::Float(v) => encode_float(f64::from(*v), || v.to_string(), || format!("{v:e}")),
        Value::Double(v) => encode_float(*v, || v.to_string(), || format!("{v:e}")),
        Value::String(v) => Cow::Borrowed(v.as_str()),
    })
}

/// Shortest round-trip text for a float. Magnitudes far from 1 switch to
/// exponential form to keep the text short.
fn encode_float(
    value: f64,
    plain: impl FnOnce() -> String,
    exponential: impl FnOnce() -> String,
) -> Cow<'static, str> {
    if value.is_nan() {
        return Cow::Borrowed("NaN");
    }
    if value.is_infinite() {
        return Cow::Borrowed(if value > 0.0 { "INF" } else { "-INF" });
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-5..1e16).contains(&magnitude) {
        Cow::Owned(exponential())
    } else {
        Cow::Owned(plain())
    }
}
