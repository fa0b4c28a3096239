//! # Enumeration Codec
//!
//! Bidirectional mapping between the literals of an enumeration and their
//! wire strings. Both directions are total over the declared literals and
//! injective, which is checked when the codec is built.

use std::collections::HashMap;

use crate::error::{DataError, DefectError, ModelError};
use crate::instance::EnumValue;
use crate::model::Enumeration;

#[derive(Debug, Clone)]
pub struct EnumCodec {
    name: String,
    from_wire: HashMap<String, String>,
    to_wire: HashMap<String, String>,
}

impl EnumCodec {
    pub fn new(enumeration: &Enumeration) -> Result<Self, ModelError> {
        let mut from_wire = HashMap::new();
        let mut to_wire = HashMap::new();
        for literal in enumeration.literals() {
            let ambiguous = |value: &str| ModelError::AmbiguousEnumeration {
                enumeration: enumeration.name().to_string(),
                value: value.to_string(),
            };
            if from_wire
                .insert(literal.value.clone(), literal.name.clone())
                .is_some()
            {
                return Err(ambiguous(&literal.value));
            }
            if to_wire
                .insert(literal.name.clone(), literal.value.clone())
                .is_some()
            {
                return Err(ambiguous(&literal.name));
            }
        }
        Ok(Self {
            name: enumeration.name().to_string(),
            from_wire,
            to_wire,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse a wire string. Unknown strings are data errors.
    pub fn decode(&self, wire: &str) -> Result<EnumValue, DataError> {
        match self.from_wire.get(wire) {
            Some(literal) => Ok(EnumValue::new(&self.name, literal.as_str())),
            None => Err(DataError::new(format!(
                "Not a valid literal of the enumeration {}: {wire}",
                self.name
            ))),
        }
    }

    /// The wire string of a literal. Unknown literals are defects.
    pub fn encode(&self, value: &EnumValue) -> Result<&str, DefectError> {
        if value.enumeration != self.name {
            return Err(DefectError::EnumerationMismatch {
                expected: self.name.clone(),
                actual: value.enumeration.clone(),
            });
        }
        self.to_wire
            .get(&value.literal)
            .map(String::as_str)
            .ok_or_else(|| DefectError::UnknownEnumLiteral {
                enumeration: self.name.clone(),
                literal: value.literal.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelDescriptor, TypeModel};

    fn color() -> EnumCodec {
        let descriptor: ModelDescriptor =
            serde_json::from_str(include_str!("../../../fixtures/shapes.json")).unwrap();
        let model = TypeModel::new(descriptor).unwrap();
        EnumCodec::new(model.enumeration("Color").unwrap()).unwrap()
    }

    #[test]
    fn test_decode_known_literal() {
        assert_eq!(color().decode("green").unwrap(), EnumValue::new("Color", "Green"));
    }

    #[test]
    fn test_decode_echoes_unknown_literal() {
        let error = color().decode("purple").unwrap_err();
        assert_eq!(error.cause, "Not a valid literal of the enumeration Color: purple");
        assert!(error.path.is_empty());
    }

    #[test]
    fn test_decode_is_case_sensitive() {
        assert!(color().decode("Red").is_err());
    }

    #[test]
    fn test_encode_known_literal() {
        assert_eq!(color().encode(&EnumValue::new("Color", "Blue")).unwrap(), "blue");
    }

    #[test]
    fn test_encode_unknown_literal_is_defect() {
        assert_eq!(
            color().encode(&EnumValue::new("Color", "Purple")).unwrap_err(),
            DefectError::UnknownEnumLiteral {
                enumeration: "Color".into(),
                literal: "Purple".into()
            }
        );
    }

    #[test]
    fn test_encode_foreign_enumeration_is_defect() {
        assert!(matches!(
            color().encode(&EnumValue::new("Unit", "Inch")),
            Err(DefectError::EnumerationMismatch { .. })
        ));
    }

    #[test]
    fn test_every_literal_round_trips() {
        let codec = color();
        for literal in ["Red", "Green", "Blue"] {
            let value = EnumValue::new("Color", literal);
            let wire = codec.encode(&value).unwrap().to_string();
            assert_eq!(codec.decode(&wire).unwrap(), value);
        }
    }
}
