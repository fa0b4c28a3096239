//! # Codec Properties
//!
//! End-to-end checks of the guarantees both surfaces make to callers:
//! precise error paths, strictness switches, discriminator dispatch,
//! integer range handling, the XML empty-element rule and the namespace
//! check.

mod common;

use serde_json::json;
use typecodec_core::{CodecError, EnumValue, JsonOptions, Value, WireFormat, XmlOptions};

use common::{shapes, SHAPES_NAMESPACE};

// ---------------------------------------------------------------------------
// 1. Error paths
// ---------------------------------------------------------------------------

#[test]
fn json_error_path_names_list_index_and_property() {
    let ctx = shapes();
    let error = typecodec_json::decode(
        &ctx,
        "Inventory",
        &json!({"items": [{"x": 1}, {"x": "bad"}]}),
        &JsonOptions::default(),
    )
    .unwrap_err();

    let CodecError::Decode(decode) = &error else {
        panic!("expected a decode error, got {error:?}");
    };
    assert_eq!(decode.format, WireFormat::Json);
    assert_eq!(decode.path.render_json(), "items[1].x");
    assert_eq!(
        error.to_string(),
        "JSON decoding failed at items[1].x: Expected an integer number, but got a value of type: string"
    );
}

#[test]
fn xml_error_path_names_elements_and_list_index() {
    let ctx = shapes();
    let text = format!(
        r#"<Inventory xmlns="{SHAPES_NAMESPACE}"><items><Item><x>1</x></Item><Item><x>bad</x></Item></items></Inventory>"#
    );
    let error = typecodec_xml::decode_str(&ctx, "Inventory", &text, &XmlOptions::default()).unwrap_err();

    let CodecError::Decode(decode) = &error else {
        panic!("expected a decode error, got {error:?}");
    };
    assert_eq!(decode.format, WireFormat::Xml);
    assert_eq!(decode.path.render_xml(), "Inventory/items/*[1]/Item/x");
}

// ---------------------------------------------------------------------------
// 2. Strictness
// ---------------------------------------------------------------------------

#[test]
fn json_additional_property_depends_on_options() {
    let ctx = shapes();
    let json = json!({"x": 3, "zzz": true});

    let strict = typecodec_json::decode(&ctx, "Item", &json, &JsonOptions::default()).unwrap_err();
    assert!(strict.to_string().contains("zzz"), "{strict}");

    let lenient = JsonOptions {
        additional_properties_allowed: true,
    };
    let item = typecodec_json::decode(&ctx, "Item", &json, &lenient).unwrap();
    assert_eq!(item.get("x"), Some(&Value::Int(3)));
    assert_eq!(item.len(), 1);
}

#[test]
fn xml_additional_attribute_depends_on_options() {
    let ctx = shapes();
    let text = format!(r#"<Item xmlns="{SHAPES_NAMESPACE}"><x zzz="1">3</x></Item>"#);

    let strict = typecodec_xml::decode_str(&ctx, "Item", &text, &XmlOptions::default()).unwrap_err();
    assert!(strict.to_string().contains("zzz"), "{strict}");

    let lenient = XmlOptions {
        additional_attributes_allowed: true,
        ..XmlOptions::default()
    };
    let item = typecodec_xml::decode_str(&ctx, "Item", &text, &lenient).unwrap();
    assert_eq!(item.get("x"), Some(&Value::Int(3)));
}

// ---------------------------------------------------------------------------
// 3. Discriminator dispatch
// ---------------------------------------------------------------------------

#[test]
fn unknown_discriminator_is_named() {
    let ctx = shapes();
    let error = typecodec_json::decode(
        &ctx,
        "Shape",
        &json!({"modelType": "UnknownThing"}),
        &JsonOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        error.to_string(),
        "JSON decoding failed: The dispatch to the JSON de-serialization of Shape is not defined for model type: UnknownThing"
    );

    let text = format!(r#"<UnknownThing xmlns="{SHAPES_NAMESPACE}"/>"#);
    let error = typecodec_xml::decode_str(&ctx, "Shape", &text, &XmlOptions::default()).unwrap_err();
    assert!(error.to_string().ends_with("UnknownThing"), "{error}");
}

#[test]
fn known_discriminator_yields_exact_runtime_type() {
    let ctx = shapes();
    let rectangle_type = ctx.class("Rectangle").unwrap().model_type();

    let from_json = typecodec_json::decode(
        &ctx,
        "Shape",
        &json!({"width": 2, "height": 3, "filled": false, "modelType": "Rectangle"}),
        &JsonOptions::default(),
    )
    .unwrap();
    assert_eq!(Some(from_json.model_type()), rectangle_type);

    let text = format!(
        r#"<Rectangle xmlns="{SHAPES_NAMESPACE}"><width>2</width><height>3</height><filled>false</filled></Rectangle>"#
    );
    let from_xml = typecodec_xml::decode_str(&ctx, "Shape", &text, &XmlOptions::default()).unwrap();
    assert_eq!(from_xml, from_json);
}

// ---------------------------------------------------------------------------
// 4. Integer range
// ---------------------------------------------------------------------------

#[test]
fn integer_beyond_double_precision_is_json_only_failure() {
    let ctx = shapes();
    let drawing = ctx
        .construct(
            "Drawing",
            [
                ("name", Value::Str("big".into())),
                ("count", Value::Int(9_007_199_254_740_993)),
                ("unit", Value::Enum(EnumValue::new("Unit", "Millimetre"))),
            ],
        )
        .unwrap();

    let error = typecodec_json::encode(&ctx, &drawing).unwrap_err();
    assert!(matches!(error, CodecError::Encode(_)), "{error:?}");
    assert!(error.to_string().contains("9007199254740993"), "{error}");
    assert!(error.to_string().contains("outside the range"), "{error}");

    let text = typecodec_xml::encode_string(&ctx, &drawing, &XmlOptions::default()).unwrap();
    assert!(text.contains("<count>9007199254740993</count>"), "{text}");
    let decoded = typecodec_xml::decode_str(&ctx, "Drawing", &text, &XmlOptions::default()).unwrap();
    assert_eq!(decoded.get("count"), Some(&Value::Int(9_007_199_254_740_993)));
}

// ---------------------------------------------------------------------------
// 5. XML empty elements
// ---------------------------------------------------------------------------

#[test]
fn empty_element_is_empty_string_but_not_integer() {
    let ctx = shapes();
    let text = format!(r#"<Drawing xmlns="{SHAPES_NAMESPACE}"><name/><count>0</count><unit>mm</unit></Drawing>"#);
    let drawing = typecodec_xml::decode_str(&ctx, "Drawing", &text, &XmlOptions::default()).unwrap();
    assert_eq!(drawing.get("name"), Some(&Value::Str(String::new())));

    let text = format!(r#"<Drawing xmlns="{SHAPES_NAMESPACE}"><name>n</name><count/><unit>mm</unit></Drawing>"#);
    let error = typecodec_xml::decode_str(&ctx, "Drawing", &text, &XmlOptions::default()).unwrap_err();
    assert!(error.to_string().starts_with("XML decoding failed at Drawing/count:"), "{error}");
}

// ---------------------------------------------------------------------------
// 6. Namespace check
// ---------------------------------------------------------------------------

#[test]
fn foreign_namespace_names_both_namespaces() {
    let ctx = shapes();
    let text = r#"<Item xmlns="urn:elsewhere"><x>1</x></Item>"#;
    let error = typecodec_xml::decode_str(&ctx, "Item", text, &XmlOptions::default()).unwrap_err();
    let message = error.to_string();
    assert!(message.contains(SHAPES_NAMESPACE), "{message}");
    assert!(message.contains("urn:elsewhere"), "{message}");
    assert!(message.contains("(line 1, column "), "{message}");
}
