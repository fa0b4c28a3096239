//! # Error Types — Data Errors, Defects, and Model Errors
//!
//! The codecs distinguish two failure classes that must never be conflated:
//!
//! - [`DataError`]: the input document (or a value being serialized) is
//!   invalid. Carries a human-readable cause and an [`ErrorPath`] that is
//!   grown by prepending segments while the failure unwinds.
//! - [`DefectError`]: a programming error of the caller, e.g. an instance
//!   whose required property is unset or an enumeration value naming a
//!   literal that does not exist.
//!
//! [`Fault`] is the internal union threaded through the recursive codecs.
//! At the public boundary it is converted into [`CodecError`], which renders
//! data errors together with their path and format:
//!
//! ```text
//! JSON decoding failed at items[1].x: Expected an integer number, but got a value of type: string
//! XML serialization failed: ...
//! ```
//!
//! [`ModelError`] is raised while validating a model descriptor, before any
//! codec runs.

use std::fmt;

use thiserror::Error;

use crate::dispatch::ModelType;
use crate::path::{ErrorPath, Segment};

// ─── Wire Format ────────────────────────────────────────────────────

/// The surface syntax a failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireFormat {
    Json,
    Xml,
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Xml => f.write_str("XML"),
        }
    }
}

// ─── Data Error ─────────────────────────────────────────────────────

/// Invalid input data, located by a path from the root of the document.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{cause}")]
pub struct DataError {
    /// Human-readable description of what was wrong.
    pub cause: String,
    /// Location of the offending value, outermost segment first.
    pub path: ErrorPath,
}

impl DataError {
    /// A data error located at the current position (empty path).
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
            path: ErrorPath::new(),
        }
    }

    /// Prepend a segment while unwinding one level of nesting.
    pub fn at(mut self, segment: Segment) -> Self {
        self.path.prepend(segment);
        self
    }

    /// The standard error for a required property that is absent.
    pub fn missing_property(serialized_name: &str) -> Self {
        Self::new(format!(
            "The required property {serialized_name} is missing"
        ))
    }
}

// ─── Defect Error ───────────────────────────────────────────────────

/// Programming errors of the caller. These never carry a data path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefectError {
    /// A class name unknown to the model.
    #[error("the class {0} is not defined in the type model")]
    UnknownClass(String),

    /// An enumeration name unknown to the model.
    #[error("the enumeration {0} is not defined in the type model")]
    UnknownEnumeration(String),

    /// A model type id that does not belong to any concrete class.
    #[error("the model type {0} is not assigned to any concrete class")]
    UnknownModelType(ModelType),

    /// An enumeration value names a literal the enumeration lacks.
    #[error("the enumeration {enumeration} has no literal {literal}")]
    UnknownEnumLiteral {
        /// Name of the enumeration.
        enumeration: String,
        /// The literal that was requested.
        literal: String,
    },

    /// An enumeration value of one enumeration used where another is expected.
    #[error("expected a literal of {expected}, but the value belongs to {actual}")]
    EnumerationMismatch {
        /// Enumeration declared by the property.
        expected: String,
        /// Enumeration the value belongs to.
        actual: String,
    },

    /// An instance whose concrete class does not satisfy the declared class.
    #[error("an instance of {actual} can not be used where {expected} is expected")]
    IncompatibleInstance {
        /// Class declared at the use site.
        expected: String,
        /// Concrete class of the instance.
        actual: String,
    },

    /// A required property is not set on an instance.
    #[error("the required property {property} of {class} is not set")]
    MissingProperty {
        /// Concrete class of the instance.
        class: String,
        /// Name of the property.
        property: String,
    },

    /// A property holds a value whose kind contradicts its annotation.
    #[error("the property {property} of {class} expects {expected}, but holds {actual}")]
    ValueMismatch {
        /// Concrete class of the instance.
        class: String,
        /// Name of the property.
        property: String,
        /// Description of the annotated type.
        expected: String,
        /// Kind of the value actually held.
        actual: &'static str,
    },

    /// An instance sets a property its class does not declare.
    #[error("the property {property} is not declared by {class}")]
    UndeclaredProperty {
        /// Concrete class of the instance.
        class: String,
        /// Name of the property.
        property: String,
    },

    /// Attempt to construct an instance of an abstract class.
    #[error("the class {0} is abstract and can not be instantiated")]
    AbstractClass(String),

    /// Reading continued after the XML reader reached the end-of-input.
    #[error("the XML reader already reached the end-of-input, but a further read was requested")]
    ReadPastEnd,

    /// Reading continued after the XML reader reported an error.
    #[error("the XML reader already failed with `{0}`, but a further read was requested")]
    ReadAfterError(String),
}

// ─── Fault ──────────────────────────────────────────────────────────

/// Either invalid data or a caller defect. Threaded through the recursion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Fault {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Defect(#[from] DefectError),
}

impl Fault {
    /// Prepend a path segment. Defects carry no path and pass unchanged.
    pub fn at(self, segment: Segment) -> Self {
        match self {
            Self::Data(error) => Self::Data(error.at(segment)),
            defect @ Self::Defect(_) => defect,
        }
    }
}

/// Result type of the recursive codec functions.
pub type CodecResult<T> = Result<T, Fault>;

// ─── Public Boundary ────────────────────────────────────────────────

/// A decoding failure rendered for callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub struct DecodeError {
    /// Surface syntax being decoded.
    pub format: WireFormat,
    /// Human-readable description of what was wrong.
    pub cause: String,
    /// Location of the offending value.
    pub path: ErrorPath,
}

impl DecodeError {
    /// The path rendered in the notation of [`Self::format`].
    pub fn rendered_path(&self) -> String {
        self.path.render(self.format)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} decoding failed", self.format)?;
        if !self.path.is_empty() {
            write!(f, " at {}", self.rendered_path())?;
        }
        write!(f, ": {}", self.cause)
    }
}

/// A serialization failure rendered for callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub struct EncodeError {
    /// Surface syntax being produced.
    pub format: WireFormat,
    /// Human-readable description of what was wrong.
    pub cause: String,
    /// Location of the offending value.
    pub path: ErrorPath,
}

impl EncodeError {
    /// The path rendered in the notation of [`Self::format`].
    pub fn rendered_path(&self) -> String {
        self.path.render(self.format)
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} serialization failed", self.format)?;
        if !self.path.is_empty() {
            write!(f, " at {}", self.rendered_path())?;
        }
        write!(f, ": {}", self.cause)
    }
}

/// Top-level error returned by every public codec entry point.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The input document is invalid.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The instance can not be represented in the target format.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The caller violated a precondition.
    #[error("codec defect: {0}")]
    Defect(#[from] DefectError),

    /// Reading the source or writing the sink failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Convert a fault raised while decoding.
    pub fn decoding(format: WireFormat, fault: Fault) -> Self {
        match fault {
            Fault::Data(error) => Self::Decode(DecodeError {
                format,
                cause: error.cause,
                path: error.path,
            }),
            Fault::Defect(defect) => Self::Defect(defect),
        }
    }

    /// Convert a fault raised while serializing.
    pub fn encoding(format: WireFormat, fault: Fault) -> Self {
        match fault {
            Fault::Data(error) => Self::Encode(EncodeError {
                format,
                cause: error.cause,
                path: error.path,
            }),
            Fault::Defect(defect) => Self::Defect(defect),
        }
    }
}

// ─── Model Error ────────────────────────────────────────────────────

/// A model descriptor that violates the structural rules of a type model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Two classes, two enumerations, or a class and an enumeration share a name.
    #[error("the name {0} is defined more than once")]
    DuplicateName(String),

    /// A reference to a class that does not exist.
    #[error("{referrer} refers to the undefined class {class}")]
    UnknownClass {
        /// Where the reference occurs.
        referrer: String,
        /// The missing class.
        class: String,
    },

    /// A reference to an enumeration that does not exist.
    #[error("{referrer} refers to the undefined enumeration {enumeration}")]
    UnknownEnumeration {
        /// Where the reference occurs.
        referrer: String,
        /// The missing enumeration.
        enumeration: String,
    },

    /// A property annotation that the codecs can not represent.
    #[error("the property {class}.{property} has an unsupported type: {reason}")]
    UnsupportedType {
        /// Owning class.
        class: String,
        /// Property name.
        property: String,
        /// What is wrong with the annotation.
        reason: String,
    },

    /// A class declares the same property, or the same serialized name, twice.
    #[error("the class {class} declares the {what} {name} more than once")]
    DuplicateProperty {
        /// The class.
        class: String,
        /// `property`, `JSON name` or `XML name`.
        what: &'static str,
        /// The repeated name.
        name: String,
    },

    /// A property name collides with the reserved discriminator key.
    #[error("the class {class} uses the reserved JSON name modelType for the property {property}")]
    ReservedName {
        /// The class.
        class: String,
        /// The property.
        property: String,
    },

    /// The class hierarchy is inconsistent.
    #[error("the class hierarchy of {class} is inconsistent: {reason}")]
    InconsistentHierarchy {
        /// The class.
        class: String,
        /// What is wrong.
        reason: String,
    },

    /// Two concrete classes share a discriminator literal or XML element name.
    #[error("the discriminator {discriminator} is shared by {first} and {second}")]
    DuplicateDiscriminator {
        /// The shared literal.
        discriminator: String,
        /// First class.
        first: String,
        /// Second class.
        second: String,
    },

    /// The constructor does not line up with the properties.
    #[error("the constructor of {class} is invalid: {reason}")]
    InvalidConstructor {
        /// The class.
        class: String,
        /// What is wrong.
        reason: String,
    },

    /// An enumeration maps two literals to one wire value, or repeats a literal.
    #[error("the enumeration {enumeration} is not a bijection: {value} occurs more than once")]
    AmbiguousEnumeration {
        /// The enumeration.
        enumeration: String,
        /// The repeated literal name or wire value.
        value: String,
    },

    /// An enumeration without literals.
    #[error("the enumeration {0} has no literals")]
    EmptyEnumeration(String),

    /// The descriptor text could not be parsed.
    #[error("the model descriptor could not be parsed: {0}")]
    Parse(String),
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_path_grows_outermost_first() {
        let error = DataError::new("boom")
            .at(Segment::Property("x".into()))
            .at(Segment::Index(1))
            .at(Segment::Property("items".into()));
        assert_eq!(error.path.render(WireFormat::Json), "items[1].x");
    }

    #[test]
    fn test_fault_at_leaves_defects_untouched() {
        let fault = Fault::from(DefectError::ReadPastEnd).at(Segment::Index(3));
        assert_eq!(fault, Fault::Defect(DefectError::ReadPastEnd));
    }

    #[test]
    fn test_decode_error_display_with_path() {
        let fault = Fault::from(
            DataError::new("Expected a boolean, but got a value of type: string")
                .at(Segment::Property("filled".into())),
        );
        let error = CodecError::decoding(WireFormat::Json, fault);
        assert_eq!(
            error.to_string(),
            "JSON decoding failed at filled: Expected a boolean, but got a value of type: string"
        );
    }

    #[test]
    fn test_encode_error_display_without_path() {
        let error = CodecError::encoding(WireFormat::Xml, DataError::new("bad").into());
        assert_eq!(error.to_string(), "XML serialization failed: bad");
    }

    #[test]
    fn test_defect_is_not_rendered_as_data_error() {
        let error = CodecError::decoding(
            WireFormat::Json,
            DefectError::UnknownClass("Nope".into()).into(),
        );
        assert!(matches!(error, CodecError::Defect(DefectError::UnknownClass(_))));
    }

    #[test]
    fn test_missing_property_message() {
        assert_eq!(
            DataError::missing_property("radius").cause,
            "The required property radius is missing"
        );
    }
}
