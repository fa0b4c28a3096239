//! # JSON Scalar Codec
//!
//! Maps primitive kinds to JSON values and back.
//!
//! ## Integers
//!
//! Decoding accepts any JSON number with an integral value inside the i64
//! range, including numbers written with a fraction or exponent such as
//! `3.0` or `1e3`. Encoding refuses integers outside `[-2^53 + 1, 2^53 - 1]`
//! since readers that parse every number as a double would lose precision.
//!
//! ## Floats
//!
//! JSON has no representation for NaN or infinities, so encoding them fails.

use serde_json::{Number, Value as Json};
use typecodec_core::scalar::{decode_base64, encode_base64};
use typecodec_core::{DataError, PrimitiveKind, ScalarRef, Value};

/// Largest integer magnitude a double represents exactly.
const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Smallest and largest doubles whose truncation fits an i64.
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// The JSON type name of a value, as used in error messages.
pub fn type_name(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

pub fn decode(kind: PrimitiveKind, json: &Json) -> Result<Value, DataError> {
    match kind {
        PrimitiveKind::Bool => decode_bool(json).map(Value::Bool),
        PrimitiveKind::Int => decode_int(json).map(Value::Int),
        PrimitiveKind::Float => decode_float(json).map(Value::Float),
        PrimitiveKind::Str => decode_str(json).map(Value::Str),
        PrimitiveKind::Bytes => decode_bytes(json).map(Value::Bytes),
    }
}

pub fn encode(scalar: ScalarRef<'_>) -> Result<Json, DataError> {
    match scalar {
        ScalarRef::Bool(v) => Ok(Json::Bool(v)),
        ScalarRef::Int(v) => encode_int(v),
        ScalarRef::Float(v) => encode_float(v),
        ScalarRef::Str(v) => Ok(Json::String(v.to_string())),
        ScalarRef::Bytes(v) => Ok(Json::String(encode_base64(v))),
    }
}

fn decode_bool(json: &Json) -> Result<bool, DataError> {
    json.as_bool().ok_or_else(|| {
        DataError::new(format!(
            "Expected a boolean, but got a value of type: {}",
            type_name(json)
        ))
    })
}

fn decode_int(json: &Json) -> Result<i64, DataError> {
    let Json::Number(number) = json else {
        return Err(DataError::new(format!(
            "Expected an integer number, but got a value of type: {}",
            type_name(json)
        )));
    };
    if let Some(v) = number.as_i64() {
        return Ok(v);
    }
    if number.is_u64() {
        return Err(DataError::new(format!(
            "Expected a 64-bit integer number, but got an integer number which does not fit in that range: {number}"
        )));
    }
    match number.as_f64() {
        Some(v) if v.fract() != 0.0 || !v.is_finite() => Err(DataError::new(format!(
            "Expected an integer number, but got a non-integer number: {number}"
        ))),
        Some(v) if (I64_LOWER..I64_UPPER).contains(&v) => Ok(v as i64),
        _ => Err(DataError::new(format!(
            "Expected a 64-bit integer number, but got a number which does not fit in that range: {number}"
        ))),
    }
}

fn decode_float(json: &Json) -> Result<f64, DataError> {
    json.as_f64().ok_or_else(|| {
        DataError::new(format!(
            "Expected a number, but got a value of type: {}",
            type_name(json)
        ))
    })
}

fn decode_str(json: &Json) -> Result<String, DataError> {
    json.as_str().map(str::to_string).ok_or_else(|| {
        DataError::new(format!(
            "Expected a string, but got a value of type: {}",
            type_name(json)
        ))
    })
}

fn decode_bytes(json: &Json) -> Result<Vec<u8>, DataError> {
    let text = json.as_str().ok_or_else(|| {
        DataError::new(format!(
            "Expected a base64-encoded string, but got a value of type: {}",
            type_name(json)
        ))
    })?;
    decode_base64(text).map_err(|e| {
        DataError::new(format!(
            "Failed to decode the base64-encoded bytes: {e}"
        ))
    })
}

fn encode_int(v: i64) -> Result<Json, DataError> {
    if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&v) {
        Ok(Json::Number(v.into()))
    } else {
        Err(DataError::new(format!(
            "The integer {v} can not be serialized to JSON as it is outside the range [-2^53 + 1, 2^53 - 1] of integers exactly representable by a 64-bit floating point number"
        )))
    }
}

fn encode_float(v: f64) -> Result<Json, DataError> {
    Number::from_f64(v).map(Json::Number).ok_or_else(|| {
        DataError::new(format!(
            "The number {v} can not be serialized to JSON as it is not finite"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_names() {
        assert_eq!(type_name(&json!(null)), "null");
        assert_eq!(type_name(&json!([1])), "array");
        assert_eq!(type_name(&json!({})), "object");
    }

    #[test]
    fn test_decode_bool_rejects_string() {
        let error = decode(PrimitiveKind::Bool, &json!("true")).unwrap_err();
        assert_eq!(error.cause, "Expected a boolean, but got a value of type: string");
    }

    #[test]
    fn test_decode_int_variants() {
        assert_eq!(decode(PrimitiveKind::Int, &json!(-5)).unwrap(), Value::Int(-5));
        assert_eq!(decode(PrimitiveKind::Int, &json!(3.0)).unwrap(), Value::Int(3));
        assert_eq!(decode(PrimitiveKind::Int, &json!(1e3)).unwrap(), Value::Int(1000));
    }

    #[test]
    fn test_decode_int_rejects_fraction() {
        let error = decode(PrimitiveKind::Int, &json!(1.5)).unwrap_err();
        assert_eq!(
            error.cause,
            "Expected an integer number, but got a non-integer number: 1.5"
        );
    }

    #[test]
    fn test_decode_int_rejects_u64_overflow() {
        let error = decode(PrimitiveKind::Int, &json!(u64::MAX)).unwrap_err();
        assert!(error.cause.contains("does not fit in that range: 18446744073709551615"));
    }

    #[test]
    fn test_decode_int_rejects_large_float() {
        let error = decode(PrimitiveKind::Int, &json!(1e19)).unwrap_err();
        assert!(error.cause.starts_with("Expected a 64-bit integer number"));
    }

    #[test]
    fn test_decode_int_rejects_wrong_type() {
        let error = decode(PrimitiveKind::Int, &json!("1")).unwrap_err();
        assert_eq!(error.cause, "Expected an integer number, but got a value of type: string");
    }

    #[test]
    fn test_decode_float_accepts_integers() {
        assert_eq!(decode(PrimitiveKind::Float, &json!(2)).unwrap(), Value::Float(2.0));
    }

    #[test]
    fn test_decode_bytes() {
        assert_eq!(
            decode(PrimitiveKind::Bytes, &json!("aGVsbG8=")).unwrap(),
            Value::Bytes(b"hello".to_vec())
        );
        let error = decode(PrimitiveKind::Bytes, &json!("not base64!")).unwrap_err();
        assert!(error.cause.starts_with("Failed to decode the base64-encoded bytes"));
    }

    #[test]
    fn test_encode_int_range() {
        assert_eq!(encode(ScalarRef::Int(MAX_SAFE_INTEGER)).unwrap(), json!(MAX_SAFE_INTEGER));
        assert_eq!(encode(ScalarRef::Int(-MAX_SAFE_INTEGER)).unwrap(), json!(-MAX_SAFE_INTEGER));
        let error = encode(ScalarRef::Int(MAX_SAFE_INTEGER + 1)).unwrap_err();
        assert!(error.cause.starts_with("The integer 9007199254740992 can not be serialized to JSON"));
        assert!(encode(ScalarRef::Int(i64::MIN)).is_err());
    }

    #[test]
    fn test_encode_non_finite_float_fails() {
        assert!(encode(ScalarRef::Float(f64::NAN)).is_err());
        assert!(encode(ScalarRef::Float(f64::INFINITY)).is_err());
        assert_eq!(encode(ScalarRef::Float(0.5)).unwrap(), json!(0.5));
    }

    #[test]
    fn test_encode_bytes_as_base64() {
        assert_eq!(encode(ScalarRef::Bytes(b"hello")).unwrap(), json!("aGVsbG8="));
    }
}
