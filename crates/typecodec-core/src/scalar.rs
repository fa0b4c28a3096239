//! Scalar views shared by the format-specific scalar codecs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::instance::Value;
use crate::model::PrimitiveKind;

/// A borrowed scalar value, already checked against its primitive kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> ScalarRef<'a> {
    /// View `value` as a scalar of `kind`, or `None` on a kind mismatch.
    pub fn of(kind: PrimitiveKind, value: &'a Value) -> Option<Self> {
        match (kind, value) {
            (PrimitiveKind::Bool, Value::Bool(v)) => Some(Self::Bool(*v)),
            (PrimitiveKind::Int, Value::Int(v)) => Some(Self::Int(*v)),
            (PrimitiveKind::Float, Value::Float(v)) => Some(Self::Float(*v)),
            (PrimitiveKind::Str, Value::Str(v)) => Some(Self::Str(v)),
            (PrimitiveKind::Bytes, Value::Bytes(v)) => Some(Self::Bytes(v)),
            _ => None,
        }
    }
}

/// Standard base64 with padding.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(text)
}
