//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use typecodec_core::{CodecContext, ModelDescriptor, TypeModel};

pub const SHAPES_NAMESPACE: &str = "https://example.com/typecodec/shapes/1/0";

/// The shapes fixture model, validated and wrapped in a context.
pub fn shapes() -> CodecContext {
    init_tracing();
    let descriptor: ModelDescriptor =
        serde_json::from_str(include_str!("../../../../fixtures/shapes.json"))
            .expect("fixture model must parse");
    let model = TypeModel::new(descriptor).expect("fixture model must validate");
    CodecContext::new(model).expect("fixture model must yield a context")
}

/// Route codec traces to the test output when `RUST_LOG` asks for them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
