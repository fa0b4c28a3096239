//! # Instances and Values
//!
//! The in-memory object graph the codecs produce and consume. An
//! [`Instance`] is a concrete class (identified by its [`ModelType`]) with a
//! set of property values keyed by property name. Absent optional
//! properties are simply missing from the map.

use std::collections::BTreeMap;

use crate::dispatch::ModelType;

/// A literal of an enumeration, named by its literal name (not its wire form).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub enumeration: String,
    pub literal: String,
}

impl EnumValue {
    pub fn new(enumeration: impl Into<String>, literal: impl Into<String>) -> Self {
        Self {
            enumeration: enumeration.into(),
            literal: literal.into(),
        }
    }
}

/// The value of a property.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Enum(EnumValue),
    Instance(Box<Instance>),
    List(Vec<Value>),
}

impl Value {
    /// Name of the variant, used in defect messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "a boolean",
            Self::Int(_) => "an integer",
            Self::Float(_) => "a float",
            Self::Str(_) => "a string",
            Self::Bytes(_) => "a byte array",
            Self::Enum(_) => "an enumeration literal",
            Self::Instance(_) => "an instance",
            Self::List(_) => "a list",
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Self::Enum(v)
    }
}

impl From<Instance> for Value {
    fn from(v: Instance) -> Self {
        Self::Instance(Box::new(v))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

/// An object of a concrete class.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    model_type: ModelType,
    properties: BTreeMap<String, Value>,
}

impl Instance {
    pub fn new(model_type: ModelType) -> Self {
        Self {
            model_type,
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(property.into(), value.into());
        self
    }

    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.properties.get(property)
    }

    /// Set a property, returning the previous value.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(property.into(), value.into())
    }

    pub fn remove(&mut self, property: &str) -> Option<Value> {
        self.properties.remove(property)
    }

    /// Properties that are set, ordered by name.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
