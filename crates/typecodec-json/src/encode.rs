//! JSON encoding of instances. Properties are written in declaration order,
//! `modelType` last.

use serde_json::{Map, Value as Json};
use typecodec_core::{
    Class, CodecContext, CodecResult, Instance, Property, Segment, Shaped, TypeAnnotation, Value,
    MODEL_TYPE_KEY,
};

use crate::scalar;

pub(crate) struct Encoder<'c> {
    ctx: &'c CodecContext,
}

impl<'c> Encoder<'c> {
    pub(crate) fn new(ctx: &'c CodecContext) -> Self {
        Self { ctx }
    }

    /// Encode an instance used where `declared` is expected.
    pub(crate) fn encode_instance(&self, instance: &Instance, declared: &Class) -> CodecResult<Json> {
        let class = self.ctx.check_assignable(instance.model_type(), declared)?;
        let mut object = Map::new();
        for (property, value) in self.ctx.encodable_properties(class, instance)? {
            let json = self
                .encode_value(class, property, property.type_annotation(), value)
                .map_err(|f| f.at(Segment::Property(property.json_name().to_string())))?;
            object.insert(property.json_name().to_string(), json);
        }
        if class.has_discriminator_field() {
            object.insert(
                MODEL_TYPE_KEY.to_string(),
                Json::String(class.discriminator().to_string()),
            );
        }
        Ok(Json::Object(object))
    }

    fn encode_value(
        &self,
        class: &Class,
        property: &Property,
        annotation: &TypeAnnotation,
        value: &Value,
    ) -> CodecResult<Json> {
        match self.ctx.shape(class, property, annotation, value)? {
            Shaped::Scalar(scalar) => Ok(scalar::encode(scalar)?),
            Shaped::Enum { codec, value } => Ok(Json::String(codec.encode(value)?.to_string())),
            Shaped::Instance { declared, instance } => self.encode_instance(instance, declared),
            Shaped::List { item, items } => items
                .iter()
                .enumerate()
                .map(|(i, value)| {
                    self.encode_value(class, property, item, value)
                        .map_err(|f| f.at(Segment::Index(i)))
                })
                .collect::<CodecResult<Vec<_>>>()
                .map(Json::Array),
        }
    }
}
