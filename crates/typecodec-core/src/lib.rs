//! # typecodec-core — Model-Driven Object Graphs
//!
//! The format-independent half of the typecodec stack. A [`TypeModel`]
//! describes classes, properties, and enumerations; a [`CodecContext`]
//! derives from it every lookup table the JSON and XML codecs need.
//!
//! ## Key Design Principles
//!
//! 1. **One model, two surfaces.** `typecodec-json` and `typecodec-xml` share
//!    the model, the dispatch tables, and the object-graph plumbing of
//!    [`graph`]. Only the surface syntax differs.
//!
//! 2. **Data errors are not defects.** Invalid input yields a [`DataError`]
//!    with an [`ErrorPath`]; a malformed instance handed to an encoder yields
//!    a [`DefectError`]. See [`error`].
//!
//! 3. **Dense model types.** Concrete classes are numbered in declaration
//!    order so per-class tables are plain vectors.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod context;
pub mod dispatch;
pub mod enums;
pub mod error;
pub mod graph;
pub mod instance;
pub mod model;
pub mod options;
pub mod path;
pub mod scalar;

pub use context::{ClassPlan, CodecContext};
pub use dispatch::{DispatchTable, ModelType};
pub use enums::EnumCodec;
pub use error::{
    CodecError, CodecResult, DataError, DecodeError, DefectError, EncodeError, Fault, ModelError,
    WireFormat,
};
pub use graph::{PropertySlots, Shaped};
pub use instance::{EnumValue, Instance, Value};
pub use model::{
    ArgumentDefault, Class, ClassDescriptor, EnumDescriptor, Enumeration, ModelDescriptor,
    PrimitiveKind, Property, TypeAnnotation, TypeModel, MODEL_TYPE_KEY,
};
pub use options::{CodecOptions, JsonOptions, OptionsError, XmlOptions};
pub use path::{ErrorPath, Segment};
pub use scalar::ScalarRef;

#[cfg(test)]
pub(crate) mod testing {
    use crate::{CodecContext, ModelDescriptor, TypeModel};

    pub(crate) fn shapes() -> CodecContext {
        let descriptor: ModelDescriptor =
            serde_json::from_str(include_str!("../../../fixtures/shapes.json")).unwrap();
        CodecContext::new(TypeModel::new(descriptor).unwrap()).unwrap()
    }
}
