//! Merge ordering: schema order at schema levels, data order inside instances.

use fwconf::merge::merge;
use fwconf::schema::{Field, Message};
use fwconf::value::{Map, Value};
use proptest::prelude::*;

/// Field count plus a shuffled subset of field indexes present in the data.
fn arb_layout() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (1usize..8).prop_flat_map(|n| {
        (
            Just(n),
            prop::sample::subsequence((0..n).collect::<Vec<_>>(), 0..=n).prop_shuffle(),
        )
    })
}

fn schema_with_fields(name: &str, n: usize) -> Message {
    (0..n).fold(Message::new(name), |message, i| {
        message.with_field(Field::new(format!("field_{i}"), "int32").with_default(Value::from(-1)))
    })
}

#[test]
fn test_schema_level_ids_follow_schema_order_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&arb_layout(), |(n, present)| {
            let schema = schema_with_fields("root", n);
            let data: Map<String, Value> = present
                .iter()
                .map(|i| (format!("FIELD_{i}"), Value::from(*i as i64)))
                .collect();

            let nodes = merge(&schema, &data).unwrap();
            prop_assert_eq!(nodes.len(), n);
            for (position, node) in nodes.iter().enumerate() {
                prop_assert_eq!(node.id, position);
                prop_assert_eq!(&node.name, &format!("field_{position}"));
                let expected = if present.contains(&position) {
                    Value::from(position as i64)
                } else {
                    Value::from(-1)
                };
                prop_assert_eq!(&node.value, &expected);
            }
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_instance_ids_follow_data_order_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&arb_layout(), |(n, present)| {
            let schema = Message::new("root").with_message(schema_with_fields("items", n).repeated());
            let mut instance: Map<String, Value> = present
                .iter()
                .map(|i| (format!("field_{i}"), Value::from(*i as i64)))
                .collect();
            instance.insert("unknown".to_string(), Value::from(0));
            let mut data = Map::new();
            data.insert("items".to_string(), Value::Array(vec![Value::Object(instance)]));

            let nodes = merge(&schema, &data).unwrap();
            let resolved = &nodes[0].arrays[0];
            prop_assert_eq!(resolved.len(), present.len());
            for (position, (node, index)) in resolved.iter().zip(&present).enumerate() {
                prop_assert_eq!(node.id, position);
                prop_assert_eq!(&node.name, &format!("field_{index}"));
            }
            Ok(())
        })
        .unwrap();
}
