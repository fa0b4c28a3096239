//! # typecodec-xml — XML Surface
//!
//! Decodes model instances from XML documents and encodes them back,
//! driven by a [`CodecContext`]. The building blocks are public:
//!
//! - [`reader::Reader`]: pull tokenizer over `xml-rs` enforcing the model's
//!   namespace and the attribute policy.
//! - [`merging::MergingReader`]: joins consecutive text nodes.
//! - [`writer::SelfClosingWriter`]: collapses empty elements to `<name />`.
//! - [`scalar`]: XML Schema lexical forms of the primitive kinds.
//!
//! ## Errors
//!
//! Data errors carry an element path such as
//! `Inventory/items/*[1]/Item/x`; tokenizer errors additionally carry the
//! line and column of the offending input.

mod decode;
mod encode;
pub mod merging;
pub mod reader;
pub mod scalar;
pub mod writer;

use std::io::{self, Read, Write};

use typecodec_core::{CodecContext, CodecError, Fault, Instance, WireFormat, XmlOptions};

use crate::decode::Decoder;
use crate::encode::{Encoder, WriteFault};
use crate::merging::MergingReader;
use crate::reader::Reader;

/// Decode a document holding one instance of `class` (or of one of its
/// concrete descendants).
pub fn decode<R: Read>(
    ctx: &CodecContext,
    class: &str,
    source: R,
    options: &XmlOptions,
) -> Result<Instance, CodecError> {
    let result = ctx.class(class).map_err(Fault::from).and_then(|class| {
        let reader = Reader::new(source, ctx.model().xml_namespace(), options);
        Decoder::new(ctx, MergingReader::new(reader)).decode_document(class)
    });
    result.map_err(|fault| CodecError::decoding(WireFormat::Xml, fault))
}

pub fn decode_str(
    ctx: &CodecContext,
    class: &str,
    text: &str,
    options: &XmlOptions,
) -> Result<Instance, CodecError> {
    decode(ctx, class, text.as_bytes(), options)
}

/// Write `instance` as a document into `sink` and return the sink.
pub fn encode<W: Write>(
    ctx: &CodecContext,
    instance: &Instance,
    sink: W,
    options: &XmlOptions,
) -> Result<W, CodecError> {
    Encoder::new(ctx, sink)
        .encode_document(instance, options.write_namespace)
        .map_err(|fault| match fault {
            WriteFault::Codec(fault) => CodecError::encoding(WireFormat::Xml, fault),
            WriteFault::Io(error) => CodecError::Io(error),
        })
}

pub fn encode_string(
    ctx: &CodecContext,
    instance: &Instance,
    options: &XmlOptions,
) -> Result<String, CodecError> {
    let bytes = encode(ctx, instance, Vec::new(), options)?;
    String::from_utf8(bytes)
        .map_err(|e| CodecError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

// ─── Tests ──────────────────────────────────────────────────────────
