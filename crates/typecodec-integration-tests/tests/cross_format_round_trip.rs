//! # Cross-Format Round Trips
//!
//! Instances decoded from one wire format are encoded to the other and
//! decoded again. Both surfaces share one context, so the resulting
//! instances must be identical.

mod common;

use proptest::prelude::*;
use serde_json::json;
use typecodec_core::{CodecContext, EnumValue, Instance, JsonOptions, Value, XmlOptions};

use common::shapes;

fn via_xml(ctx: &CodecContext, class: &str, instance: &Instance) -> Instance {
    let text = typecodec_xml::encode_string(ctx, instance, &XmlOptions::default()).unwrap();
    typecodec_xml::decode_str(ctx, class, &text, &XmlOptions::default()).unwrap()
}

fn via_json(ctx: &CodecContext, class: &str, instance: &Instance) -> Instance {
    let json = typecodec_json::encode(ctx, instance).unwrap();
    typecodec_json::decode(ctx, class, &json, &JsonOptions::default()).unwrap()
}

// ---------------------------------------------------------------------------
// 1. A full drawing moves from JSON to XML and back
// ---------------------------------------------------------------------------

#[test]
fn json_drawing_survives_xml() {
    let ctx = shapes();
    let json = json!({
        "name": "sketch",
        "count": 3,
        "unit": "in",
        "createdBy": "ada",
        "scale": 0.25,
        "visible": false,
        "thumbnail": "AAEC",
        "checksum": "abc",
        "origin": {"x": 1.0, "y": -2.5},
        "background": {"label": "bg", "width": 10, "height": 20, "filled": true, "modelType": "Rectangle"},
        "shapes": [
            {"radius": 1.0, "modelType": "Circle"},
            {
                "members": [{"radius": 2.0, "color": "green", "modelType": "Circle"}],
                "tags": ["a", "b"],
                "caption": "nested",
                "modelType": "LabeledGroup"
            }
        ],
        "layers": [0, -1, 9007199254740991_i64],
        "palette": ["blue"],
        "modelType": "Drawing"
    });

    let from_json = typecodec_json::decode(&ctx, "Drawing", &json, &JsonOptions::default()).unwrap();
    assert_eq!(from_json.get("thumbnail"), Some(&Value::Bytes(vec![0, 1, 2])));

    let from_xml = via_xml(&ctx, "Drawing", &from_json);
    assert_eq!(from_xml, from_json);
    assert_eq!(typecodec_json::encode(&ctx, &from_xml).unwrap(), json!({
        "name": "sketch",
        "count": 3,
        "unit": "in",
        "createdBy": "ada",
        "scale": 0.25,
        "visible": false,
        "thumbnail": "AAEC",
        "checksum": "abc",
        "origin": {"x": 1.0, "y": -2.5},
        "background": {"label": "bg", "width": 10, "height": 20, "filled": true, "modelType": "Rectangle"},
        "shapes": [
            {"radius": 1.0, "color": "red", "modelType": "Circle"},
            {
                "members": [{"radius": 2.0, "color": "green", "modelType": "Circle"}],
                "tags": ["a", "b"],
                "caption": "nested",
                "modelType": "LabeledGroup"
            }
        ],
        "layers": [0, -1, 9007199254740991_i64],
        "palette": ["blue"],
        "modelType": "Drawing"
    }));
}

// ---------------------------------------------------------------------------
// 2. An XML document moves to JSON and back
// ---------------------------------------------------------------------------

#[test]
fn xml_inventory_survives_json() {
    let ctx = shapes();
    let text = format!(
        r#"<Inventory xmlns="{}">
             <items>
               <Item><x>1</x></Item>
               <Item><x>-7</x></Item>
             </items>
           </Inventory>"#,
        common::SHAPES_NAMESPACE
    );
    let from_xml = typecodec_xml::decode_str(&ctx, "Inventory", &text, &XmlOptions::default()).unwrap();
    assert_eq!(
        typecodec_json::encode(&ctx, &from_xml).unwrap(),
        json!({"items": [{"x": 1}, {"x": -7}]})
    );
    assert_eq!(via_json(&ctx, "Inventory", &from_xml), from_xml);
}

#[test]
fn abstract_entry_point_dispatches_in_both_formats() {
    let ctx = shapes();
    let group = ctx
        .construct(
            "LabeledGroup",
            [
                ("caption", Value::Str("top".into())),
                (
                    "members",
                    Value::List(vec![Value::from(
                        ctx.construct(
                            "Rectangle",
                            [
                                ("width", Value::Int(1)),
                                ("height", Value::Int(2)),
                                ("filled", Value::Bool(false)),
                            ],
                        )
                        .unwrap(),
                    )]),
                ),
            ],
        )
        .unwrap();

    for class in ["Shape", "Group", "LabeledGroup"] {
        assert_eq!(via_json(&ctx, class, &group), group, "JSON via {class}");
        assert_eq!(via_xml(&ctx, class, &group), group, "XML via {class}");
    }
}

// ---------------------------------------------------------------------------
// 3. Property: any constructible drawing survives both formats
// ---------------------------------------------------------------------------

const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

fn color(index: u8) -> Value {
    let literal = ["Red", "Green", "Blue"][usize::from(index % 3)];
    Value::Enum(EnumValue::new("Color", literal))
}

#[allow(clippy::too_many_arguments)]
fn drawing(
    ctx: &CodecContext,
    name: String,
    count: i64,
    inch: bool,
    scale: Option<f64>,
    thumbnail: Option<Vec<u8>>,
    radii: Vec<i32>,
    layers: Option<Vec<i64>>,
    palette: Option<Vec<u8>>,
) -> Instance {
    let unit = if inch { "Inch" } else { "Millimetre" };
    let mut arguments = vec![
        ("name", Value::Str(name)),
        ("count", Value::Int(count)),
        ("unit", Value::Enum(EnumValue::new("Unit", unit))),
    ];
    if let Some(scale) = scale {
        arguments.push(("scale", Value::Float(scale)));
    }
    if let Some(thumbnail) = thumbnail {
        arguments.push(("thumbnail", Value::Bytes(thumbnail)));
    }
    let shapes = radii
        .into_iter()
        .map(|r| {
            ctx.construct("Circle", [("radius", Value::Float(f64::from(r) / 8.0))])
                .map(Value::from)
                .unwrap()
        })
        .collect();
    arguments.push(("shapes", Value::List(shapes)));
    if let Some(layers) = layers {
        arguments.push(("layers", Value::List(layers.into_iter().map(Value::Int).collect())));
    }
    if let Some(palette) = palette {
        arguments.push(("palette", Value::List(palette.into_iter().map(color).collect())));
    }
    ctx.construct("Drawing", arguments).unwrap()
}

proptest! {
    #[test]
    fn drawings_round_trip_through_both_formats(
        name in "[a-zA-Z0-9 &<>]{0,16}",
        count in -MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER,
        inch in any::<bool>(),
        scale in proptest::option::of(-1.0e12_f64..1.0e12),
        thumbnail in proptest::option::of(proptest::collection::vec(any::<u8>(), 1..24)),
        radii in proptest::collection::vec(any::<i32>(), 0..4),
        layers in proptest::option::of(proptest::collection::vec(-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER, 0..5)),
        palette in proptest::option::of(proptest::collection::vec(any::<u8>(), 0..4)),
    ) {
        let ctx = shapes();
        let original = drawing(&ctx, name, count, inch, scale, thumbnail, radii, layers, palette);

        prop_assert_eq!(&via_json(&ctx, "Drawing", &original), &original);
        prop_assert_eq!(&via_xml(&ctx, "Drawing", &original), &original);
        prop_assert_eq!(&via_xml(&ctx, "Drawing", &via_json(&ctx, "Drawing", &original)), &original);
    }
}
