//! # Object-Graph Plumbing
//!
//! Format-independent parts of walking an object graph:
//!
//! - **Decoding** collects property values into [`PropertySlots`], one slot
//!   per declared property, and assembles the instance through the class
//!   constructor, substituting argument defaults for absent values.
//! - **Encoding** uses [`CodecContext::encodable_properties`] to visit the
//!   set properties of an instance in declaration order, and
//!   [`CodecContext::shape`] to check each value against its annotation.
//!
//! Every mismatch between an instance and the model found while encoding is
//! a [`DefectError`]: the caller built an instance the model does not allow.

use crate::context::CodecContext;
use crate::enums::EnumCodec;
use crate::error::{DataError, DefectError};
use crate::instance::{EnumValue, Instance, Value};
use crate::model::{ArgumentDefault, Class, Property, TypeAnnotation};
use crate::scalar::ScalarRef;

// ─── Decoding ───────────────────────────────────────────────────────

/// Values collected for one concrete class while decoding.
#[derive(Debug)]
pub struct PropertySlots<'c> {
    class: &'c Class,
    values: Vec<Option<Value>>,
}

impl<'c> PropertySlots<'c> {
    pub fn new(class: &'c Class) -> Self {
        Self {
            class,
            values: vec![None; class.properties().len()],
        }
    }

    pub fn class(&self) -> &'c Class {
        self.class
    }

    pub fn is_filled(&self, slot: usize) -> bool {
        matches!(self.values.get(slot), Some(Some(_)))
    }

    pub fn fill(&mut self, slot: usize, value: Value) {
        if let Some(target) = self.values.get_mut(slot) {
            *target = Some(value);
        }
    }

    /// Fail on the first required property without a value, in declaration order.
    pub fn check_required(
        &self,
        serialized_name: impl Fn(&Property) -> &str,
    ) -> Result<(), DataError> {
        for (property, value) in self.class.properties().iter().zip(&self.values) {
            if property.is_required() && value.is_none() {
                return Err(DataError::missing_property(serialized_name(property)));
            }
        }
        Ok(())
    }

    /// Build the instance through the constructor. Absent arguments take
    /// their default, if any.
    pub fn assemble(mut self) -> Result<Instance, DefectError> {
        let model_type = self
            .class
            .model_type()
            .ok_or_else(|| DefectError::AbstractClass(self.class.name().to_string()))?;
        let mut instance = Instance::new(model_type);
        for argument in self.class.constructor() {
            let slot = argument.property_index();
            let property = &self.class.properties()[slot];
            let value = self.values[slot].take().or_else(|| match argument.default() {
                Some(ArgumentDefault::EmptyList) => Some(Value::List(Vec::new())),
                Some(ArgumentDefault::EnumLiteral {
                    enumeration,
                    literal,
                }) => Some(Value::Enum(EnumValue::new(enumeration, literal))),
                None => None,
            });
            match value {
                Some(value) => {
                    instance.set(property.name(), value);
                }
                None if property.is_required() => {
                    return Err(DefectError::MissingProperty {
                        class: self.class.name().to_string(),
                        property: property.name().to_string(),
                    })
                }
                None => {}
            }
        }
        Ok(instance)
    }
}

impl CodecContext {
    /// Construct an instance from named arguments, applying constructor defaults.
    pub fn construct<K, I>(&self, class: &str, arguments: I) -> Result<Instance, DefectError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let class = self.class(class)?;
        if class.is_abstract() {
            return Err(DefectError::AbstractClass(class.name().to_string()));
        }
        let mut slots = PropertySlots::new(class);
        for (name, value) in arguments {
            let argument = class
                .constructor()
                .iter()
                .find(|a| a.name() == name.as_ref())
                .ok_or_else(|| DefectError::UndeclaredProperty {
                    class: class.name().to_string(),
                    property: name.as_ref().to_string(),
                })?;
            slots.fill(argument.property_index(), value);
        }
        slots.assemble()
    }
}

// ─── Encoding ───────────────────────────────────────────────────────

/// A property value checked against its annotation.
#[derive(Debug)]
pub enum Shaped<'c, 'i> {
    Scalar(ScalarRef<'i>),
    Enum {
        codec: &'c EnumCodec,
        value: &'i EnumValue,
    },
    Instance {
        /// The class declared by the annotation, not the concrete class.
        declared: &'c Class,
        instance: &'i Instance,
    },
    List {
        item: &'c TypeAnnotation,
        items: &'i [Value],
    },
}

impl CodecContext {
    /// Set properties of `instance` in declaration order. Fails on a required
    /// property that is unset or on a property the class does not declare.
    pub fn encodable_properties<'c, 'i>(
        &'c self,
        class: &'c Class,
        instance: &'i Instance,
    ) -> Result<Vec<(&'c Property, &'i Value)>, DefectError> {
        if let Some((name, _)) = instance
            .properties()
            .find(|(name, _)| class.property(name).is_none())
        {
            return Err(DefectError::UndeclaredProperty {
                class: class.name().to_string(),
                property: name.to_string(),
            });
        }
        let mut present = Vec::with_capacity(instance.len());
        for property in class.properties() {
            match instance.get(property.name()) {
                Some(value) => present.push((property, value)),
                None if property.is_required() => {
                    return Err(DefectError::MissingProperty {
                        class: class.name().to_string(),
                        property: property.name().to_string(),
                    })
                }
                None => {}
            }
        }
        Ok(present)
    }

    /// Check `value` against `annotation` (an optional layer is looked through).
    pub fn shape<'c, 'i>(
        &'c self,
        class: &Class,
        property: &Property,
        annotation: &'c TypeAnnotation,
        value: &'i Value,
    ) -> Result<Shaped<'c, 'i>, DefectError> {
        let mismatch = || DefectError::ValueMismatch {
            class: class.name().to_string(),
            property: property.name().to_string(),
            expected: annotation.describe(),
            actual: value.kind_name(),
        };
        match (annotation.beneath_optional(), value) {
            (TypeAnnotation::Primitive(kind), _)
            | (TypeAnnotation::ConstrainedPrimitive { kind, .. }, _) => {
                ScalarRef::of(*kind, value).map(Shaped::Scalar).ok_or_else(mismatch)
            }
            (TypeAnnotation::Enum(name), Value::Enum(enum_value)) => Ok(Shaped::Enum {
                codec: self.enum_codec(name)?,
                value: enum_value,
            }),
            (TypeAnnotation::ClassRef(name), Value::Instance(instance)) => Ok(Shaped::Instance {
                declared: self.class(name)?,
                instance,
            }),
            (TypeAnnotation::List(item), Value::List(items)) => Ok(Shaped::List { item, items }),
            _ => Err(mismatch()),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
