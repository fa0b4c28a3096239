//! # Model Types and Dispatch Tables
//!
//! Every concrete class receives a dense [`ModelType`] id in declaration
//! order. A class with concrete descendants owns a [`DispatchTable`] mapping
//! each discriminator literal it may encounter to the model type whose
//! concrete decoding should run. The same structure, built over all
//! concrete classes, maps XML element names to model types.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Class, TypeModel};

/// Dense identifier of a concrete class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelType(u32);

impl ModelType {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Position of the class among the concrete classes of the model.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Maps discriminator literals to the model types they select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTable {
    owner: String,
    targets: HashMap<String, ModelType>,
}

impl DispatchTable {
    /// The table of a class with concrete descendants: the descendants plus
    /// the class itself when it is concrete. `None` for classes without
    /// descendants, which decode directly.
    pub fn for_class(model: &TypeModel, class: &Class) -> Option<Self> {
        if !class.dispatches() {
            return None;
        }
        let own = class.model_type().map(|mt| (class.discriminator().to_string(), mt));
        let descendants = class.concrete_descendants().iter().filter_map(|name| {
            let descendant = model.class(name)?;
            Some((descendant.discriminator().to_string(), descendant.model_type()?))
        });
        Some(Self {
            owner: class.name().to_string(),
            targets: own.into_iter().chain(descendants).collect(),
        })
    }

    /// A table over every concrete class of the model, keyed by discriminator.
    pub fn for_model(model: &TypeModel) -> Self {
        Self {
            owner: String::new(),
            targets: model
                .concrete_classes()
                .filter_map(|c| Some((c.discriminator().to_string(), c.model_type()?)))
                .collect(),
        }
    }

    /// The model type selected by a discriminator literal.
    pub fn resolve(&self, literal: &str) -> Option<ModelType> {
        self.targets.get(literal).copied()
    }

    /// Name of the owning class; empty for the model-wide table.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
