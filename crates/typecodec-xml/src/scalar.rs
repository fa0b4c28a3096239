//! # XML Scalar Codec
//!
//! Scalars are the text content of their element, in XML Schema lexical
//! forms:
//!
//! | Kind  | Type              | Accepted text                          |
//! |-------|-------------------|----------------------------------------|
//! | bool  | `xs:boolean`      | `true`, `false`, `1`, `0`              |
//! | int   | `xs:long`         | decimal, optional sign                 |
//! | float | `xs:double`       | decimal or exponent, `INF`, `-INF`, `NaN` |
//! | str   | `xs:string`       | anything                               |
//! | bytes | `xs:base64Binary` | standard base64                        |

use std::num::IntErrorKind;

use typecodec_core::scalar::{decode_base64, encode_base64};
use typecodec_core::{DataError, PrimitiveKind, ScalarRef, Value};

/// Parse the text content of an element. Surrounding XML whitespace is
/// collapsed for every kind except `xs:string`.
pub fn parse(kind: PrimitiveKind, text: &str) -> Result<Value, DataError> {
    let text = match kind {
        PrimitiveKind::Str => text,
        _ => text.trim_matches(is_xml_whitespace),
    };
    match kind {
        PrimitiveKind::Bool => parse_bool(text).map(Value::Bool),
        PrimitiveKind::Int => parse_long(text).map(Value::Int),
        PrimitiveKind::Float => parse_double(text).map(Value::Float),
        PrimitiveKind::Str => Ok(Value::Str(text.to_string())),
        PrimitiveKind::Bytes => decode_base64(text).map(Value::Bytes).map_err(|e| {
            DataError::new(format!(
                "Expected to parse an xs:base64Binary from text, but the value was invalid: {e}"
            ))
        }),
    }
}

pub fn format(scalar: ScalarRef<'_>) -> String {
    match scalar {
        ScalarRef::Bool(true) => "true".to_string(),
        ScalarRef::Bool(false) => "false".to_string(),
        ScalarRef::Int(v) => v.to_string(),
        ScalarRef::Float(v) => format_double(v),
        ScalarRef::Str(v) => v.to_string(),
        ScalarRef::Bytes(v) => encode_base64(v),
    }
}

fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn parse_bool(text: &str) -> Result<bool, DataError> {
    match text {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(DataError::new(format!(
            "Expected to parse an xs:boolean from text, but got an invalid value: {text}"
        ))),
    }
}

fn parse_long(text: &str) -> Result<i64, DataError> {
    text.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => DataError::new(format!(
            "Expected to parse an xs:long from text, but the value is out of range: {text}"
        )),
        _ => DataError::new(format!(
            "Expected to parse an xs:long from text, but got an invalid value: {text}"
        )),
    })
}

fn parse_double(text: &str) -> Result<f64, DataError> {
    match text {
        "INF" | "+INF" => return Ok(f64::INFINITY),
        "-INF" => return Ok(f64::NEG_INFINITY),
        "NaN" => return Ok(f64::NAN),
        _ => {}
    }
    let invalid = || {
        DataError::new(format!(
            "Expected to parse an xs:double from text, but got an invalid value: {text}"
        ))
    };
    let value: f64 = text.parse().map_err(|_| invalid())?;
    if value.is_nan() {
        return Err(invalid());
    }
    if value.is_infinite() {
        let lowered = text.to_ascii_lowercase();
        if lowered.contains("inf") {
            return Err(invalid());
        }
        return Err(DataError::new(format!(
            "Expected to parse an xs:double from text, but the value is out of range: {text}"
        )));
    }
    Ok(value)
}

fn format_double(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "INF".to_string()
    } else if v == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        v.to_string()
    }
}
