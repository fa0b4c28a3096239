//! # Type Model — Classes, Properties, Enumerations
//!
//! The immutable description of the data model that drives both codecs.
//! A model is loaded from a serde-deserializable [`ModelDescriptor`] and
//! validated once by [`TypeModel::new`]. Every lookup performed by the codecs
//! afterwards is infallible with respect to the model's own structure; any
//! remaining failure is either a data error or a caller defect.
//!
//! ## Descriptor Format
//!
//! Type annotations use serde's externally tagged representation:
//!
//! ```text
//! { "primitive": "int" }
//! { "optional": { "list": { "class": "Shape" } } }
//! { "constrained_primitive": { "name": "NonEmptyString", "kind": "str" } }
//! ```
//!
//! ## Validation
//!
//! - Names of classes and enumerations are unique.
//! - Every referenced class or enumeration exists.
//! - `Optional` does not nest and list items are not lists or optionals.
//! - JSON and XML property names are unique per class and never `modelType`.
//! - Hierarchy links are symmetric: each concrete descendant lists the class
//!   among its ancestors, each ancestor of a concrete class lists it among
//!   its concrete descendants, and descendants declare every property of
//!   their ancestors with the same type.
//! - Every class that dispatches has targets that serialize the discriminator.
//! - Discriminators are unique across concrete classes.
//! - Constructor arguments cover each property exactly once; defaults only
//!   apply to optional properties of a matching type.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::dispatch::ModelType;
use crate::error::ModelError;

/// The reserved JSON key carrying the discriminator of an instance.
pub const MODEL_TYPE_KEY: &str = "modelType";

// ─── Type Annotations ───────────────────────────────────────────────

/// The scalar kinds both formats know how to represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Bool,
    Int,
    Float,
    Str,
    Bytes,
}

impl PrimitiveKind {
    /// The XML Schema datatype used to represent this kind.
    pub fn xsd_name(self) -> &'static str {
        match self {
            Self::Bool => "xs:boolean",
            Self::Int => "xs:long",
            Self::Float => "xs:double",
            Self::Str => "xs:string",
            Self::Bytes => "xs:base64Binary",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bytes => "bytes",
        }
    }
}

/// The declared type of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeAnnotation {
    Primitive(PrimitiveKind),
    /// A value of the named enumeration.
    Enum(String),
    /// A named constraint over a primitive. Serialized like the primitive.
    ConstrainedPrimitive { name: String, kind: PrimitiveKind },
    /// An instance of the named class or any of its concrete descendants.
    #[serde(rename = "class")]
    ClassRef(String),
    List(Box<TypeAnnotation>),
    Optional(Box<TypeAnnotation>),
}

impl TypeAnnotation {
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// The annotation with one `Optional` layer removed, if present.
    pub fn beneath_optional(&self) -> &TypeAnnotation {
        match self {
            Self::Optional(inner) => inner,
            other => other,
        }
    }

    /// The primitive kind for primitives and constrained primitives.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) | Self::ConstrainedPrimitive { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Human-readable rendering used in defect messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.as_str().to_string(),
            Self::Enum(name) => format!("enum {name}"),
            Self::ConstrainedPrimitive { name, kind } => format!("{name} ({})", kind.as_str()),
            Self::ClassRef(name) => format!("instance of {name}"),
            Self::List(item) => format!("list of {}", item.describe()),
            Self::Optional(inner) => format!("optional {}", inner.describe()),
        }
    }
}

// ─── Descriptors ────────────────────────────────────────────────────

/// Serialized form of a whole model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Namespace every XML element must belong to.
    pub xml_namespace: String,
    #[serde(default)]
    pub enums: Vec<EnumDescriptor>,
    #[serde(default)]
    pub classes: Vec<ClassDescriptor>,
}

impl ModelDescriptor {
    /// Parse a descriptor from YAML. JSON documents parse as well.
    pub fn from_yaml_str(text: &str) -> Result<Self, ModelError> {
        serde_yaml::from_str(text).map_err(|e| ModelError::Parse(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    pub name: String,
    pub literals: Vec<EnumLiteral>,
}

/// One literal of an enumeration and its wire string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumLiteral {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    #[serde(default)]
    pub is_abstract: bool,
    /// All properties including inherited ones, in declaration order.
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    #[serde(default)]
    pub ancestors: Vec<String>,
    #[serde(default)]
    pub concrete_descendants: Vec<String>,
    /// Defaults to one argument per property without defaults.
    #[serde(default)]
    pub constructor: Option<Vec<ArgumentDescriptor>>,
    /// Defaults to the class name.
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default = "default_true")]
    pub has_discriminator_field: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_annotation: TypeAnnotation,
    /// The class that introduces the property. Defaults to the listing class.
    #[serde(default)]
    pub declared_in: Option<String>,
    #[serde(default)]
    pub json_name: Option<String>,
    #[serde(default)]
    pub xml_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    pub name: String,
    /// The property the argument initializes. Defaults to the argument name.
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub default: Option<ArgumentDefault>,
}

/// Value substituted for an absent optional constructor argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentDefault {
    EmptyList,
    EnumLiteral { enumeration: String, literal: String },
}

// ─── Validated Model ────────────────────────────────────────────────

/// A property of a validated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    type_annotation: TypeAnnotation,
    owner: String,
    json_name: String,
    xml_name: String,
}

impl Property {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_annotation(&self) -> &TypeAnnotation {
        &self.type_annotation
    }

    /// The class that introduces the property.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn json_name(&self) -> &str {
        &self.json_name
    }

    pub fn xml_name(&self) -> &str {
        &self.xml_name
    }

    pub fn is_required(&self) -> bool {
        !self.type_annotation.is_optional()
    }
}

/// A validated constructor argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorArgument {
    name: String,
    property: usize,
    default: Option<ArgumentDefault>,
}

impl ConstructorArgument {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index into [`Class::properties`].
    pub fn property_index(&self) -> usize {
        self.property
    }

    pub fn default(&self) -> Option<&ArgumentDefault> {
        self.default.as_ref()
    }
}

/// A validated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    name: String,
    is_abstract: bool,
    properties: Vec<Property>,
    ancestors: Vec<String>,
    concrete_descendants: Vec<String>,
    constructor: Vec<ConstructorArgument>,
    discriminator: String,
    has_discriminator_field: bool,
    model_type: Option<ModelType>,
}

impl Class {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_concrete(&self) -> bool {
        !self.is_abstract
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    pub fn concrete_descendants(&self) -> &[String] {
        &self.concrete_descendants
    }

    pub fn constructor(&self) -> &[ConstructorArgument] {
        &self.constructor
    }

    /// The literal written to `modelType` and used as the XML element name.
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Whether the JSON form of an instance carries `modelType`.
    pub fn has_discriminator_field(&self) -> bool {
        self.has_discriminator_field
    }

    /// Dense id of a concrete class. `None` for abstract classes.
    pub fn model_type(&self) -> Option<ModelType> {
        self.model_type
    }

    /// Whether decoding this class goes through a dispatch table.
    pub fn dispatches(&self) -> bool {
        !self.concrete_descendants.is_empty()
    }
}

/// A validated enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    name: String,
    literals: Vec<EnumLiteral>,
}

impl Enumeration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn literals(&self) -> &[EnumLiteral] {
        &self.literals
    }

    pub fn has_literal(&self, name: &str) -> bool {
        self.literals.iter().any(|l| l.name == name)
    }
}

/// The validated, immutable type model.
#[derive(Debug, Clone)]
pub struct TypeModel {
    xml_namespace: String,
    classes: Vec<Class>,
    enums: Vec<Enumeration>,
    class_index: HashMap<String, usize>,
    enum_index: HashMap<String, usize>,
    /// Class index for each model type, in model-type order.
    concrete: Vec<usize>,
}

impl TypeModel {
    /// Validate a descriptor and assign model types.
    pub fn new(descriptor: ModelDescriptor) -> Result<Self, ModelError> {
        let mut seen = HashSet::new();
        for name in descriptor
            .enums
            .iter()
            .map(|e| &e.name)
            .chain(descriptor.classes.iter().map(|c| &c.name))
        {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::DuplicateName(name.clone()));
            }
        }

        let enums: Vec<Enumeration> = descriptor
            .enums
            .into_iter()
            .map(validate_enumeration)
            .collect::<Result<_, _>>()?;
        let enum_index: HashMap<String, usize> = enums
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
        let class_index: HashMap<String, usize> = descriptor
            .classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();

        let mut classes = Vec::with_capacity(descriptor.classes.len());
        let mut concrete = Vec::new();
        for (index, class) in descriptor.classes.iter().enumerate() {
            let model_type = if class.is_abstract {
                None
            } else {
                concrete.push(index);
                Some(ModelType::new((concrete.len() - 1) as u32))
            };
            classes.push(resolve_class(class, model_type)?);
        }

        let model = Self {
            xml_namespace: descriptor.xml_namespace,
            classes,
            enums,
            class_index,
            enum_index,
            concrete,
        };
        model.validate()?;

        tracing::debug!(
            classes = model.classes.len(),
            concrete = model.concrete.len(),
            enums = model.enums.len(),
            "type model validated"
        );
        Ok(model)
    }

    pub fn xml_namespace(&self) -> &str {
        &self.xml_namespace
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn enums(&self) -> &[Enumeration] {
        &self.enums
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.class_index.get(name).map(|&i| &self.classes[i])
    }

    pub fn enumeration(&self, name: &str) -> Option<&Enumeration> {
        self.enum_index.get(name).map(|&i| &self.enums[i])
    }

    /// Number of concrete classes, i.e. of model types.
    pub fn model_type_count(&self) -> usize {
        self.concrete.len()
    }

    /// The concrete class of a model type.
    pub fn concrete_class(&self, model_type: ModelType) -> Option<&Class> {
        self.concrete
            .get(model_type.index())
            .map(|&i| &self.classes[i])
    }

    /// Concrete classes in model-type order.
    pub fn concrete_classes(&self) -> impl Iterator<Item = &Class> {
        self.concrete.iter().map(|&i| &self.classes[i])
    }

    /// Whether an instance of `model_type` satisfies the declared class.
    pub fn is_assignable(&self, model_type: ModelType, declared: &Class) -> bool {
        match self.concrete_class(model_type) {
            Some(concrete) => {
                concrete.name == declared.name
                    || declared.concrete_descendants.contains(&concrete.name)
            }
            None => false,
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        let mut discriminators: HashMap<&str, &str> = HashMap::new();
        for class in &self.classes {
            self.validate_hierarchy(class)?;
            for property in &class.properties {
                self.validate_annotation(class, property, property.type_annotation(), false)?;
            }
            self.validate_constructor(class)?;
            if class.is_concrete() {
                if let Some(first) = discriminators.insert(&class.discriminator, &class.name) {
                    return Err(ModelError::DuplicateDiscriminator {
                        discriminator: class.discriminator.clone(),
                        first: first.to_string(),
                        second: class.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_hierarchy(&self, class: &Class) -> Result<(), ModelError> {
        let inconsistent = |reason: String| ModelError::InconsistentHierarchy {
            class: class.name.clone(),
            reason,
        };

        for ancestor in &class.ancestors {
            if ancestor == &class.name {
                return Err(inconsistent("the class lists itself as an ancestor".into()));
            }
            let Some(ancestor_class) = self.class(ancestor) else {
                return Err(ModelError::UnknownClass {
                    referrer: format!("the ancestors of {}", class.name),
                    class: ancestor.clone(),
                });
            };
            if class.is_concrete() && !ancestor_class.concrete_descendants.contains(&class.name) {
                return Err(inconsistent(format!(
                    "the ancestor {ancestor} does not list the class among its concrete descendants"
                )));
            }
        }

        if class.is_abstract && class.concrete_descendants.is_empty() {
            return Err(inconsistent(
                "an abstract class needs at least one concrete descendant".into(),
            ));
        }
        if class.dispatches() && class.is_concrete() && !class.has_discriminator_field {
            return Err(inconsistent(
                "a class with descendants must serialize the discriminator".into(),
            ));
        }

        for name in &class.concrete_descendants {
            let descendant = self.class(name).ok_or_else(|| ModelError::UnknownClass {
                referrer: format!("the concrete descendants of {}", class.name),
                class: name.clone(),
            })?;
            if descendant.is_abstract {
                return Err(inconsistent(format!("the descendant {name} is abstract")));
            }
            if !descendant.ancestors.contains(&class.name) {
                return Err(inconsistent(format!(
                    "the descendant {name} does not list {} among its ancestors",
                    class.name
                )));
            }
            if !descendant.has_discriminator_field {
                return Err(inconsistent(format!(
                    "the descendant {name} does not serialize the discriminator"
                )));
            }
            for property in &class.properties {
                match descendant.property(&property.name) {
                    None => {
                        return Err(inconsistent(format!(
                            "the descendant {name} lacks the inherited property {}",
                            property.name
                        )))
                    }
                    Some(inherited) if inherited.type_annotation != property.type_annotation => {
                        return Err(inconsistent(format!(
                            "the descendant {name} changes the type of the inherited property {}",
                            property.name
                        )))
                    }
                    Some(_) => {}
                }
            }
        }

        for property in &class.properties {
            if property.owner != class.name && !class.ancestors.contains(&property.owner) {
                return Err(inconsistent(format!(
                    "the property {} is declared in {}, which is not an ancestor",
                    property.name, property.owner
                )));
            }
        }
        Ok(())
    }

    fn validate_annotation(
        &self,
        class: &Class,
        property: &Property,
        annotation: &TypeAnnotation,
        nested: bool,
    ) -> Result<(), ModelError> {
        let unsupported = |reason: &str| ModelError::UnsupportedType {
            class: class.name.clone(),
            property: property.name.clone(),
            reason: reason.to_string(),
        };
        let referrer = || format!("the property {}.{}", class.name, property.name);

        match annotation {
            TypeAnnotation::Primitive(_) | TypeAnnotation::ConstrainedPrimitive { .. } => Ok(()),
            TypeAnnotation::Enum(name) => match self.enumeration(name) {
                Some(_) => Ok(()),
                None => Err(ModelError::UnknownEnumeration {
                    referrer: referrer(),
                    enumeration: name.clone(),
                }),
            },
            TypeAnnotation::ClassRef(name) => match self.class(name) {
                Some(_) => Ok(()),
                None => Err(ModelError::UnknownClass {
                    referrer: referrer(),
                    class: name.clone(),
                }),
            },
            TypeAnnotation::List(item) => {
                if nested {
                    return Err(unsupported("lists can not be nested"));
                }
                if matches!(**item, TypeAnnotation::Optional(_)) {
                    return Err(unsupported("list items can not be optional"));
                }
                self.validate_annotation(class, property, item, true)
            }
            TypeAnnotation::Optional(inner) => {
                if nested || inner.is_optional() {
                    return Err(unsupported("optional is only allowed at the top level"));
                }
                self.validate_annotation(class, property, inner, false)
            }
        }
    }

    fn validate_constructor(&self, class: &Class) -> Result<(), ModelError> {
        let invalid = |reason: String| ModelError::InvalidConstructor {
            class: class.name.clone(),
            reason,
        };

        let mut covered = vec![false; class.properties.len()];
        for argument in &class.constructor {
            if std::mem::replace(&mut covered[argument.property], true) {
                return Err(invalid(format!(
                    "the property {} is initialized more than once",
                    class.properties[argument.property].name
                )));
            }
            let property = &class.properties[argument.property];
            let Some(default) = &argument.default else {
                continue;
            };
            if property.is_required() {
                return Err(invalid(format!(
                    "the argument {} has a default, but {} is required",
                    argument.name, property.name
                )));
            }
            match (default, property.type_annotation.beneath_optional()) {
                (ArgumentDefault::EmptyList, TypeAnnotation::List(_)) => {}
                (
                    ArgumentDefault::EnumLiteral {
                        enumeration,
                        literal,
                    },
                    TypeAnnotation::Enum(declared),
                ) if enumeration == declared => {
                    let known = self
                        .enumeration(enumeration)
                        .map(|e| e.has_literal(literal))
                        .unwrap_or(false);
                    if !known {
                        return Err(invalid(format!(
                            "the default of {} names the unknown literal {enumeration}.{literal}",
                            argument.name
                        )));
                    }
                }
                _ => {
                    return Err(invalid(format!(
                        "the default of {} does not match the type of {}",
                        argument.name, property.name
                    )))
                }
            }
        }

        if let Some(missing) = covered.iter().position(|c| !c) {
            return Err(invalid(format!(
                "no argument initializes the property {}",
                class.properties[missing].name
            )));
        }
        Ok(())
    }
}

fn validate_enumeration(descriptor: EnumDescriptor) -> Result<Enumeration, ModelError> {
    if descriptor.literals.is_empty() {
        return Err(ModelError::EmptyEnumeration(descriptor.name));
    }
    let mut names = HashSet::new();
    let mut values = HashSet::new();
    for literal in &descriptor.literals {
        for (seen, value) in [(&mut names, &literal.name), (&mut values, &literal.value)] {
            if !seen.insert(value.as_str()) {
                return Err(ModelError::AmbiguousEnumeration {
                    enumeration: descriptor.name.clone(),
                    value: value.clone(),
                });
            }
        }
    }
    Ok(Enumeration {
        name: descriptor.name,
        literals: descriptor.literals,
    })
}

fn resolve_class(
    descriptor: &ClassDescriptor,
    model_type: Option<ModelType>,
) -> Result<Class, ModelError> {
    let mut properties: Vec<Property> = Vec::with_capacity(descriptor.properties.len());
    let mut json_names = HashSet::new();
    let mut xml_names = HashSet::new();
    for p in &descriptor.properties {
        let json_name = p.json_name.clone().unwrap_or_else(|| p.name.clone());
        let xml_name = p.xml_name.clone().unwrap_or_else(|| p.name.clone());
        if properties.iter().any(|q| q.name == p.name) {
            return Err(duplicate(descriptor, "property", &p.name));
        }
        if json_name == MODEL_TYPE_KEY {
            return Err(ModelError::ReservedName {
                class: descriptor.name.clone(),
                property: p.name.clone(),
            });
        }
        if !json_names.insert(json_name.clone()) {
            return Err(duplicate(descriptor, "JSON name", &json_name));
        }
        if !xml_names.insert(xml_name.clone()) {
            return Err(duplicate(descriptor, "XML name", &xml_name));
        }
        properties.push(Property {
            name: p.name.clone(),
            type_annotation: p.type_annotation.clone(),
            owner: p.declared_in.clone().unwrap_or_else(|| descriptor.name.clone()),
            json_name,
            xml_name,
        });
    }

    let constructor: Vec<ConstructorArgument> = match &descriptor.constructor {
        None => (0..properties.len())
            .map(|i| ConstructorArgument {
                name: properties[i].name.clone(),
                property: i,
                default: None,
            })
            .collect(),
        Some(arguments) => arguments
            .iter()
            .map(|a| {
                let target = a.property.as_deref().unwrap_or(&a.name);
                let property = properties
                    .iter()
                    .position(|p| p.name == target)
                    .ok_or_else(|| ModelError::InvalidConstructor {
                        class: descriptor.name.clone(),
                        reason: format!(
                            "the argument {} refers to the unknown property {target}",
                            a.name
                        ),
                    })?;
                Ok(ConstructorArgument {
                    name: a.name.clone(),
                    property,
                    default: a.default.clone(),
                })
            })
            .collect::<Result<_, ModelError>>()?,
    };

    Ok(Class {
        name: descriptor.name.clone(),
        is_abstract: descriptor.is_abstract,
        properties,
        ancestors: descriptor.ancestors.clone(),
        concrete_descendants: descriptor.concrete_descendants.clone(),
        constructor,
        discriminator: descriptor
            .discriminator
            .clone()
            .unwrap_or_else(|| descriptor.name.clone()),
        has_discriminator_field: descriptor.has_discriminator_field,
        model_type,
    })
}

fn duplicate(descriptor: &ClassDescriptor, what: &'static str, name: &str) -> ModelError {
    ModelError::DuplicateProperty {
        class: descriptor.name.clone(),
        what,
        name: name.to_string(),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
