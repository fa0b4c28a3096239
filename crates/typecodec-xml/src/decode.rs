//! # XML Decoding
//!
//! Recursive descent over the merged token stream.
//!
//! ## Document Shape
//!
//! ```text
//! <Drawing xmlns="...">        instance wrapped in its discriminator element
//!   <name>sketch</name>        scalar property: text content
//!   <origin><x>0</x>...</origin>   leaf class: property sequence directly
//!   <background>
//!     <Rectangle>...</Rectangle>   polymorphic: wrapped instance
//!   </background>
//!   <shapes><Circle>...</Circle></shapes>   list of instances
//!   <layers><item>1</item></layers>         list of scalars
//! </Drawing>
//! ```
//!
//! Whitespace-only text between elements is skipped. Decoding is fail-fast:
//! the first error is returned with the element names and list indices on
//! the way to it prepended to its path.

use std::io::Read;

use typecodec_core::{
    Class, CodecContext, CodecResult, DataError, DefectError, Instance, ModelType, PrimitiveKind,
    PropertySlots, Segment, TypeAnnotation, Value,
};

use crate::merging::MergingReader;
use crate::reader::Node;
use crate::scalar;

/// Element name wrapping each scalar or enumeration item of a list.
pub(crate) const ITEM_ELEMENT: &str = "item";

pub(crate) struct Decoder<'c, R: Read> {
    ctx: &'c CodecContext,
    reader: MergingReader<R>,
}

impl<'c, R: Read> Decoder<'c, R> {
    pub(crate) fn new(ctx: &'c CodecContext, reader: MergingReader<R>) -> Self {
        Self { ctx, reader }
    }

    /// Decode a whole document holding exactly one instance of `class`.
    pub(crate) fn decode_document(&mut self, class: &Class) -> CodecResult<Instance> {
        self.advance()?;
        self.skip_whitespace()?;
        let instance = self.decode_element(class)?;
        self.skip_whitespace()?;
        match self.current()? {
            Node::EndOfInput => Ok(instance),
            other => Err(DataError::new(format!(
                "Expected end-of-input, but got {}",
                other.describe()
            ))
            .into()),
        }
    }

    /// An instance wrapped in the element named by its discriminator.
    fn decode_element(&mut self, expected: &Class) -> CodecResult<Instance> {
        let name = match self.current()? {
            Node::Start(name) => name.clone(),
            other => {
                return Err(DataError::new(format!(
                    "Expected a start element opening an instance of {}, but got {}",
                    expected.name(),
                    other.describe()
                ))
                .into())
            }
        };
        let model_type = self.ctx.element_table().resolve(&name).ok_or_else(|| {
            DataError::new(format!(
                "Unexpected start element as its name does not correspond to any model type: {name}"
            ))
        })?;
        if !self.ctx.model().is_assignable(model_type, expected) {
            return Err(DataError::new(format!(
                "Impossible to de-serialize an instance of {} from <{name}>",
                expected.name()
            ))
            .into());
        }
        if expected.dispatches() {
            tracing::trace!(
                class = expected.name(),
                element = name.as_str(),
                model_type = %model_type,
                "dispatching XML decode"
            );
        }

        self.enclosed(&name, |decoder| decoder.decode_sequence(model_type))
    }

    /// Run `body` after the start element `name`, then consume its stop
    /// element. Failures are located inside `name`.
    fn enclosed<T>(
        &mut self,
        name: &str,
        body: impl FnOnce(&mut Self) -> CodecResult<T>,
    ) -> CodecResult<T> {
        self.enclosed_unlocated(name, body)
            .map_err(|f| f.at(Segment::Element(name.to_string())))
    }

    fn enclosed_unlocated<T>(
        &mut self,
        name: &str,
        body: impl FnOnce(&mut Self) -> CodecResult<T>,
    ) -> CodecResult<T> {
        self.advance()?;
        let value = body(self)?;
        self.skip_whitespace()?;
        self.expect_stop(name)?;
        self.advance()?;
        Ok(value)
    }

    /// The property elements of a concrete class, up to its stop element.
    fn decode_sequence(&mut self, model_type: ModelType) -> CodecResult<Instance> {
        let ctx = self.ctx;
        let class = ctx.concrete(model_type)?;
        let plan = ctx.plan(model_type)?;
        let mut slots = PropertySlots::new(class);

        loop {
            self.skip_whitespace()?;
            let name = match self.current()? {
                Node::Stop(_) => break,
                Node::Start(name) => name.clone(),
                other => {
                    return Err(DataError::new(format!(
                        "Expected a start element opening a property of {}, but got {}",
                        class.name(),
                        other.describe()
                    ))
                    .into())
                }
            };
            let slot = plan.xml_slot(&name).ok_or_else(|| {
                DataError::new(format!(
                    "Expected a start element opening a property of {}, but got <{name}> which is not one of its properties",
                    class.name()
                ))
            })?;
            if slots.is_filled(slot) {
                return Err(DataError::new(format!(
                    "The property <{name}> of {} appears more than once",
                    class.name()
                ))
                .into());
            }
            let property = &class.properties()[slot];
            let value = self.enclosed(&name, |decoder| {
                decoder.decode_content(property.type_annotation())
            })?;
            slots.fill(slot, value);
        }

        slots.check_required(|p| p.xml_name())?;
        Ok(slots.assemble()?)
    }

    /// Content of a property element or list item: text, a wrapped instance,
    /// the property sequence of a leaf class, or the items of a list.
    fn decode_content(&mut self, annotation: &TypeAnnotation) -> CodecResult<Value> {
        let ctx = self.ctx;
        match annotation {
            TypeAnnotation::Primitive(kind) | TypeAnnotation::ConstrainedPrimitive { kind, .. } => {
                self.decode_scalar(*kind)
            }
            TypeAnnotation::Enum(name) => {
                let codec = ctx.enum_codec(name)?;
                let text = self.decode_text(PrimitiveKind::Str)?;
                Ok(Value::Enum(codec.decode(&text)?))
            }
            TypeAnnotation::ClassRef(name) => {
                let class = ctx.class(name)?;
                if class.dispatches() {
                    self.skip_whitespace()?;
                    Ok(Value::from(self.decode_element(class)?))
                } else {
                    let model_type = class
                        .model_type()
                        .ok_or_else(|| DefectError::AbstractClass(class.name().to_string()))?;
                    Ok(Value::from(self.decode_sequence(model_type)?))
                }
            }
            // Only property content; list items are never lists.
            TypeAnnotation::List(item) => self.decode_list(item),
            TypeAnnotation::Optional(inner) => self.decode_content(inner),
        }
    }

    fn decode_list(&mut self, item: &TypeAnnotation) -> CodecResult<Value> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace()?;
            if matches!(self.current()?, Node::Stop(_)) {
                return Ok(Value::List(items));
            }
            let index = items.len();
            let value = self
                .decode_list_item(item)
                .map_err(|f| f.at(Segment::Index(index)))?;
            items.push(value);
        }
    }

    fn decode_list_item(&mut self, item: &TypeAnnotation) -> CodecResult<Value> {
        if let TypeAnnotation::ClassRef(name) = item {
            let ctx = self.ctx;
            let class = ctx.class(name)?;
            return Ok(Value::from(self.decode_element(class)?));
        }
        match self.current()? {
            Node::Start(name) if name == ITEM_ELEMENT => {}
            other => {
                return Err(DataError::new(format!(
                    "Expected a start element <{ITEM_ELEMENT}> opening a list item, but got {}",
                    other.describe()
                ))
                .into())
            }
        }
        self.enclosed(ITEM_ELEMENT, |decoder| decoder.decode_content(item))
    }

    fn decode_scalar(&mut self, kind: PrimitiveKind) -> CodecResult<Value> {
        let text = self.decode_text(kind)?;
        Ok(scalar::parse(kind, &text)?)
    }

    /// Text content of the current element. An element without content
    /// yields the empty string only for strings.
    fn decode_text(&mut self, kind: PrimitiveKind) -> CodecResult<String> {
        match self.current()? {
            Node::Text(text) => {
                let text = text.clone();
                self.advance()?;
                Ok(text)
            }
            Node::Stop(_) if kind == PrimitiveKind::Str => Ok(String::new()),
            other => Err(DataError::new(format!(
                "Expected to parse an {} from XML text, but got {}",
                kind.xsd_name(),
                other.describe()
            ))
            .into()),
        }
    }

    fn expect_stop(&self, name: &str) -> CodecResult<()> {
        match self.current()? {
            Node::Stop(stop) if stop == name => Ok(()),
            other => Err(DataError::new(format!(
                "Expected a stop element </{name}>, but got {}",
                other.describe()
            ))
            .into()),
        }
    }

    fn skip_whitespace(&mut self) -> CodecResult<()> {
        while let Node::Text(text) = self.current()? {
            if !is_whitespace(text) {
                break;
            }
            self.advance()?;
        }
        Ok(())
    }

    /// Move to the next node, surfacing tokenizer errors as data errors.
    fn advance(&mut self) -> CodecResult<()> {
        self.reader.read()?;
        self.current().map(|_| ())
    }

    fn current(&self) -> CodecResult<&Node> {
        match self.reader.node() {
            Node::Error(error) => Err(DataError::new(error.to_string()).into()),
            node => Ok(node),
        }
    }
}

fn is_whitespace(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}
