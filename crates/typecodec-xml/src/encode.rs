//! XML encoding of instances, mirroring the document shape read by
//! [`crate::decode`].

use std::io::{self, Write};

use thiserror::Error;
use typecodec_core::{
    Class, CodecContext, DefectError, Fault, Instance, Property, Shaped, TypeAnnotation, Value,
};

use crate::decode::ITEM_ELEMENT;
use crate::scalar;
use crate::writer::SelfClosingWriter;

/// Failure while writing: a codec fault or an error of the sink.
#[derive(Error, Debug)]
pub(crate) enum WriteFault {
    #[error(transparent)]
    Codec(#[from] Fault),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<DefectError> for WriteFault {
    fn from(defect: DefectError) -> Self {
        Self::Codec(defect.into())
    }
}

type WriteResult<T> = Result<T, WriteFault>;

pub(crate) struct Encoder<'c, W: Write> {
    ctx: &'c CodecContext,
    writer: SelfClosingWriter<W>,
}

impl<'c, W: Write> Encoder<'c, W> {
    pub(crate) fn new(ctx: &'c CodecContext, sink: W) -> Self {
        Self {
            ctx,
            writer: SelfClosingWriter::new(sink),
        }
    }

    /// Write `instance` as the root element, optionally declaring the namespace.
    pub(crate) fn encode_document(
        mut self,
        instance: &Instance,
        write_namespace: bool,
    ) -> WriteResult<W> {
        let ctx = self.ctx;
        let class = ctx.concrete(instance.model_type())?;
        if write_namespace {
            self.writer
                .start_element_with_namespace(class.discriminator(), ctx.model().xml_namespace())?;
        } else {
            self.writer.start_element(class.discriminator())?;
        }
        self.encode_sequence(class, instance)?;
        self.writer.stop_element(class.discriminator())?;
        Ok(self.writer.finish()?)
    }

    /// An instance wrapped in the element named by its discriminator.
    fn encode_element(&mut self, instance: &Instance, declared: &Class) -> WriteResult<()> {
        let class = self.ctx.check_assignable(instance.model_type(), declared)?;
        self.writer.start_element(class.discriminator())?;
        self.encode_sequence(class, instance)?;
        self.writer.stop_element(class.discriminator())?;
        Ok(())
    }

    fn encode_sequence(&mut self, class: &Class, instance: &Instance) -> WriteResult<()> {
        let ctx = self.ctx;
        for (property, value) in ctx.encodable_properties(class, instance)? {
            self.writer.start_element(property.xml_name())?;
            self.encode_content(class, property, property.type_annotation(), value)?;
            self.writer.stop_element(property.xml_name())?;
        }
        Ok(())
    }

    fn encode_content(
        &mut self,
        class: &Class,
        property: &Property,
        annotation: &TypeAnnotation,
        value: &Value,
    ) -> WriteResult<()> {
        let ctx = self.ctx;
        match ctx.shape(class, property, annotation, value)? {
            Shaped::Scalar(scalar) => self.writer.text(&scalar::format(scalar))?,
            Shaped::Enum { codec, value } => self.writer.text(codec.encode(value)?)?,
            Shaped::Instance { declared, instance } => {
                if declared.dispatches() {
                    self.encode_element(instance, declared)?;
                } else {
                    let concrete = ctx.check_assignable(instance.model_type(), declared)?;
                    self.encode_sequence(concrete, instance)?;
                }
            }
            Shaped::List { item, items } => {
                for value in items {
                    match ctx.shape(class, property, item, value)? {
                        Shaped::Instance { declared, instance } => {
                            self.encode_element(instance, declared)?;
                        }
                        _ => {
                            self.writer.start_element(ITEM_ELEMENT)?;
                            self.encode_content(class, property, item, value)?;
                            self.writer.stop_element(ITEM_ELEMENT)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
