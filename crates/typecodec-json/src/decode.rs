//! # JSON Decoding
//!
//! Walks a `serde_json::Value` tree along the type model. Classes with
//! concrete descendants first read `modelType` from the raw object and
//! dispatch; concrete classes then decode their properties in declaration
//! order, failing fast with the property name prepended to the error path.

use serde_json::{Map, Value as Json};
use typecodec_core::{
    Class, CodecContext, CodecResult, DataError, DefectError, Instance, JsonOptions, ModelType,
    PropertySlots, Segment, TypeAnnotation, Value, MODEL_TYPE_KEY,
};

use crate::scalar::{self, type_name};

pub(crate) struct Decoder<'c> {
    ctx: &'c CodecContext,
    options: &'c JsonOptions,
}

impl<'c> Decoder<'c> {
    pub(crate) fn new(ctx: &'c CodecContext, options: &'c JsonOptions) -> Self {
        Self { ctx, options }
    }

    /// Decode an instance of `class` or, if it has descendants, of the
    /// descendant named by `modelType`.
    pub(crate) fn decode_class(&self, class: &Class, json: &Json) -> CodecResult<Instance> {
        let model_type = if class.dispatches() {
            self.dispatch(class, json)?
        } else {
            class
                .model_type()
                .ok_or_else(|| DefectError::AbstractClass(class.name().to_string()))?
        };
        self.decode_concrete(model_type, json)
    }

    fn dispatch(&self, class: &Class, json: &Json) -> CodecResult<ModelType> {
        let object = expect_object(json)?;
        let literal = match object.get(MODEL_TYPE_KEY) {
            None => return Err(DataError::missing_property(MODEL_TYPE_KEY).into()),
            Some(Json::String(literal)) => literal,
            Some(other) => return Err(model_type_not_a_string(other).into()),
        };
        let model_type = self
            .ctx
            .dispatch_table(class.name())
            .and_then(|table| table.resolve(literal))
            .ok_or_else(|| {
                DataError::new(format!(
                    "The dispatch to the JSON de-serialization of {} is not defined for model type: {literal}",
                    class.name()
                ))
            })?;
        tracing::trace!(
            class = class.name(),
            discriminator = literal.as_str(),
            model_type = %model_type,
            "dispatching JSON decode"
        );
        Ok(model_type)
    }

    fn decode_concrete(&self, model_type: ModelType, json: &Json) -> CodecResult<Instance> {
        let class = self.ctx.concrete(model_type)?;
        let plan = self.ctx.plan(model_type)?;
        let object = expect_object(json)?;

        if !self.options.additional_properties_allowed {
            for key in object.keys() {
                let known = plan.json_slot(key).is_some()
                    || (key == MODEL_TYPE_KEY && class.has_discriminator_field());
                if !known {
                    return Err(
                        DataError::new(format!("Unexpected additional property: {key}")).into(),
                    );
                }
            }
        }

        let mut slots = PropertySlots::new(class);
        for (slot, property) in class.properties().iter().enumerate() {
            let Some(json) = object.get(property.json_name()) else {
                if property.is_required() {
                    return Err(DataError::missing_property(property.json_name()).into());
                }
                continue;
            };
            let value = self
                .decode_value(property.type_annotation(), json)
                .map_err(|f| f.at(Segment::Property(property.json_name().to_string())))?;
            slots.fill(slot, value);
        }

        if class.has_discriminator_field() {
            check_discriminator(class, object)?;
        }

        Ok(slots.assemble()?)
    }

    fn decode_value(&self, annotation: &TypeAnnotation, json: &Json) -> CodecResult<Value> {
        match annotation.beneath_optional() {
            TypeAnnotation::Primitive(kind) | TypeAnnotation::ConstrainedPrimitive { kind, .. } => {
                Ok(scalar::decode(*kind, json)?)
            }
            TypeAnnotation::Enum(name) => {
                let codec = self.ctx.enum_codec(name)?;
                let text = json.as_str().ok_or_else(|| {
                    DataError::new(format!(
                        "Expected a string, but got a value of type: {}",
                        type_name(json)
                    ))
                })?;
                Ok(Value::Enum(codec.decode(text)?))
            }
            TypeAnnotation::ClassRef(name) => {
                let class = self.ctx.class(name)?;
                Ok(Value::from(self.decode_class(class, json)?))
            }
            TypeAnnotation::List(item) => {
                let Json::Array(array) = json else {
                    return Err(DataError::new(format!(
                        "Expected an array, but got a value of type: {}",
                        type_name(json)
                    ))
                    .into());
                };
                let items = array
                    .iter()
                    .enumerate()
                    .map(|(i, json)| {
                        self.decode_value(item, json)
                            .map_err(|f| f.at(Segment::Index(i)))
                    })
                    .collect::<CodecResult<Vec<_>>>()?;
                Ok(Value::List(items))
            }
            // Nested optionals are rejected when the model is built.
            TypeAnnotation::Optional(inner) => self.decode_value(inner, json),
        }
    }
}

fn expect_object(json: &Json) -> Result<&Map<String, Json>, DataError> {
    json.as_object().ok_or_else(|| {
        DataError::new(format!(
            "Expected an object, but got: {}",
            type_name(json)
        ))
    })
}

fn model_type_not_a_string(json: &Json) -> DataError {
    DataError::new(format!(
        "Expected {MODEL_TYPE_KEY} to be a string, but got: {}",
        type_name(json)
    ))
    .at(Segment::Property(MODEL_TYPE_KEY.to_string()))
}

/// The discriminator of a concrete class must match, even after dispatch.
fn check_discriminator(class: &Class, object: &Map<String, Json>) -> Result<(), DataError> {
    match object.get(MODEL_TYPE_KEY) {
        None => Err(DataError::missing_property(MODEL_TYPE_KEY)),
        Some(Json::String(literal)) if literal == class.discriminator() => Ok(()),
        Some(Json::String(literal)) => Err(DataError::new(format!(
            "Expected the model type {}, but got: {literal}",
            class.discriminator()
        ))
        .at(Segment::Property(MODEL_TYPE_KEY.to_string()))),
        Some(other) => Err(model_type_not_a_string(other)),
    }
}
