//! # typecodec-json — JSON Surface
//!
//! Decodes model instances from `serde_json::Value` trees and encodes them
//! back, driven by a [`CodecContext`].
//!
//! ## Wire Conventions
//!
//! - Instances are objects keyed by the JSON names of their properties.
//! - Classes that serialize their discriminator carry it under `modelType`,
//!   written after all properties.
//! - Absent optional properties are omitted. `null` is not a valid value.
//! - Byte arrays are standard base64 strings.
//! - Enumeration values are their wire strings.
//!
//! ## Errors
//!
//! Data errors surface as [`CodecError::Decode`] or [`CodecError::Encode`]
//! with the path of the offending value, e.g.
//! `JSON decoding failed at items[1].x: Expected an integer number, but got a value of type: string`.

mod decode;
mod encode;
pub mod scalar;

use serde_json::Value as Json;
use typecodec_core::{CodecContext, CodecError, DataError, Fault, Instance, JsonOptions, WireFormat};

use crate::decode::Decoder;
use crate::encode::Encoder;

/// Decode an instance of `class` (or of one of its concrete descendants).
pub fn decode(
    ctx: &CodecContext,
    class: &str,
    json: &Json,
    options: &JsonOptions,
) -> Result<Instance, CodecError> {
    let result = ctx
        .class(class)
        .map_err(Fault::from)
        .and_then(|class| Decoder::new(ctx, options).decode_class(class, json));
    result.map_err(|fault| CodecError::decoding(WireFormat::Json, fault))
}

/// Parse `text` as JSON, then [`decode`] it.
pub fn decode_str(
    ctx: &CodecContext,
    class: &str,
    text: &str,
    options: &JsonOptions,
) -> Result<Instance, CodecError> {
    let json: Json = serde_json::from_str(text).map_err(|e| {
        CodecError::decoding(
            WireFormat::Json,
            DataError::new(format!("Failed to parse the JSON text: {e}")).into(),
        )
    })?;
    decode(ctx, class, &json, options)
}

/// Encode an instance as its own concrete class.
pub fn encode(ctx: &CodecContext, instance: &Instance) -> Result<Json, CodecError> {
    let result = ctx
        .concrete(instance.model_type())
        .map_err(Fault::from)
        .and_then(|class| Encoder::new(ctx).encode_instance(instance, class));
    result.map_err(|fault| CodecError::encoding(WireFormat::Json, fault))
}

/// [`encode`] and render compactly.
pub fn encode_string(ctx: &CodecContext, instance: &Instance) -> Result<String, CodecError> {
    Ok(encode(ctx, instance)?.to_string())
}

// ─── Tests ──────────────────────────────────────────────────────────
