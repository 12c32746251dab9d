//! Property tests for escaping and the structural value text.

use engine_component::{LeafKind, Value};
use engine_math::{Vec2, Vec3};
use engine_save::{CodecTable, Deserializer, Serializer, Translation, escape};
use proptest::prelude::*;

fn finite_f32() -> impl Strategy<Value = f32> {
    (-1_000_000i32..1_000_000i32).prop_map(|v| v as f32 * 0.01)
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i32>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        finite_f32().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        any::<char>().prop_map(Value::from),
        any::<String>().prop_map(Value::from),
        "[;:{}\\[\\]=|\\\\a-z]{0,12}".prop_map(Value::from),
        (finite_f32(), finite_f32()).prop_map(|(x, y)| Value::from(Vec2::new(x, y))),
        (finite_f32(), finite_f32(), finite_f32())
            .prop_map(|(x, y, z)| Value::from(Vec3::new(x, y, z))),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
            prop::collection::vec((inner.clone(), inner), 0..4).prop_map(Value::Map),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn escape_round_trips_structural_text(text in "[;:{}\\[\\]=|\\\\a-z ]*") {
        prop_assert_eq!(escape::decode(&escape::encode(&text)), text);
    }

    #[test]
    fn escape_round_trips_any_text(text in any::<String>()) {
        prop_assert_eq!(escape::decode(&escape::encode(&text)), text);
    }

    #[test]
    fn escaped_text_has_no_unescaped_delimiters(text in any::<String>()) {
        let encoded = escape::encode(&text);
        prop_assert_eq!(escape::find_unescaped_any(&encoded, escape::STRUCTURAL), None);
    }

    #[test]
    fn values_round_trip(value in value()) {
        let codecs = CodecTable::with_defaults();
        let text = Serializer::new(&codecs, &[]).serialize(&value);
        let parsed = Deserializer::new(&codecs, &[]).deserialize(&text).unwrap();
        prop_assert_eq!(parsed, value);
    }

    #[test]
    fn values_round_trip_across_codec_orders(
        value in value(),
        order in Just(LeafKind::ALL.to_vec()).prop_shuffle(),
    ) {
        let saving = CodecTable::with_defaults();
        let loading = CodecTable::with_order(order);
        let text = Serializer::new(&saving, &[]).serialize(&value);

        let translation = Translation::build(saving.type_table(), &loading);
        let parsed = Deserializer::new(&loading, &[])
            .with_translation(&translation)
            .deserialize(&text)
            .unwrap();
        prop_assert_eq!(parsed, value);
    }
}
