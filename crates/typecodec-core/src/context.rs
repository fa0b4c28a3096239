//! # Codec Context
//!
//! Everything the codecs look up while walking a document, derived once from
//! a validated [`TypeModel`]: enumeration codecs, per-class dispatch tables,
//! the model-wide element table, and a plan per concrete class that maps
//! serialized property names to property slots.
//!
//! A context is immutable after construction and can be shared freely
//! between threads.

use std::collections::HashMap;

use crate::dispatch::{DispatchTable, ModelType};
use crate::enums::EnumCodec;
use crate::error::{DefectError, ModelError};
use crate::model::{Class, TypeModel};

/// Serialized-name lookups of one concrete class.
#[derive(Debug, Clone)]
pub struct ClassPlan {
    json_slots: HashMap<String, usize>,
    xml_slots: HashMap<String, usize>,
}

impl ClassPlan {
    fn new(class: &Class) -> Self {
        let mut json_slots = HashMap::new();
        let mut xml_slots = HashMap::new();
        for (i, property) in class.properties().iter().enumerate() {
            json_slots.insert(property.json_name().to_string(), i);
            xml_slots.insert(property.xml_name().to_string(), i);
        }
        Self {
            json_slots,
            xml_slots,
        }
    }

    /// Property index for a JSON object key.
    pub fn json_slot(&self, key: &str) -> Option<usize> {
        self.json_slots.get(key).copied()
    }

    /// Property index for an XML element name.
    pub fn xml_slot(&self, name: &str) -> Option<usize> {
        self.xml_slots.get(name).copied()
    }
}

/// Shared lookup state of both codecs.
#[derive(Debug, Clone)]
pub struct CodecContext {
    model: TypeModel,
    enums: HashMap<String, EnumCodec>,
    dispatch: HashMap<String, DispatchTable>,
    elements: DispatchTable,
    plans: Vec<ClassPlan>,
}

impl CodecContext {
    pub fn new(model: TypeModel) -> Result<Self, ModelError> {
        let enums = model
            .enums()
            .iter()
            .map(|e| Ok((e.name().to_string(), EnumCodec::new(e)?)))
            .collect::<Result<HashMap<_, _>, ModelError>>()?;
        let dispatch: HashMap<String, DispatchTable> = model
            .classes()
            .iter()
            .filter_map(|c| Some((c.name().to_string(), DispatchTable::for_class(&model, c)?)))
            .collect();
        let elements = DispatchTable::for_model(&model);
        let plans = model.concrete_classes().map(ClassPlan::new).collect();

        tracing::debug!(
            enums = enums.len(),
            dispatch_tables = dispatch.len(),
            elements = elements.len(),
            "codec context built"
        );
        Ok(Self {
            model,
            enums,
            dispatch,
            elements,
            plans,
        })
    }

    pub fn model(&self) -> &TypeModel {
        &self.model
    }

    pub fn class(&self, name: &str) -> Result<&Class, DefectError> {
        self.model
            .class(name)
            .ok_or_else(|| DefectError::UnknownClass(name.to_string()))
    }

    /// The concrete class of a model type.
    pub fn concrete(&self, model_type: ModelType) -> Result<&Class, DefectError> {
        self.model
            .concrete_class(model_type)
            .ok_or(DefectError::UnknownModelType(model_type))
    }

    pub fn plan(&self, model_type: ModelType) -> Result<&ClassPlan, DefectError> {
        self.plans
            .get(model_type.index())
            .ok_or(DefectError::UnknownModelType(model_type))
    }

    pub fn enum_codec(&self, name: &str) -> Result<&EnumCodec, DefectError> {
        self.enums
            .get(name)
            .ok_or_else(|| DefectError::UnknownEnumeration(name.to_string()))
    }

    /// The dispatch table of a class, if it has concrete descendants.
    pub fn dispatch_table(&self, class: &str) -> Option<&DispatchTable> {
        self.dispatch.get(class)
    }

    /// Discriminator (XML element name) to model type, over all concrete classes.
    pub fn element_table(&self) -> &DispatchTable {
        &self.elements
    }

    /// Resolve the concrete class of an instance used where `declared` is expected.
    pub fn check_assignable(
        &self,
        model_type: ModelType,
        declared: &Class,
    ) -> Result<&Class, DefectError> {
        let concrete = self.concrete(model_type)?;
        if self.model.is_assignable(model_type, declared) {
            Ok(concrete)
        } else {
            Err(DefectError::IncompatibleInstance {
                expected: declared.name().to_string(),
                actual: concrete.name().to_string(),
            })
        }
    }
}
