//! Property tests for the algebraic laws the operations promise.

use proptest::prelude::*;
use serde_json::Value;

use crate::json::{from_json, to_json};
use crate::nest::{Nest, Record};
use crate::{field, map, pack, prune, structure, up_to};

/// Field names, including the spellings the JSON bridge reserves.
fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "\\$?[a-z]{1,6}",
        1 => "\\${1,3}(type|tuple)",
    ]
}

/// Strategy for nests over `i64` leaves covering every node kind, including
/// empty containers and named records.
fn nest_strategy() -> impl Strategy<Value = Nest<i64>> {
    let leaf = any::<i64>().prop_map(Nest::Leaf);
    leaf.prop_recursive(
        4,  // depth
        64, // desired size
        6,  // items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Nest::Sequence),
                prop::collection::vec(inner.clone(), 0..6).prop_map(Nest::Tuple),
                prop::collection::btree_map(key_strategy(), inner.clone(), 0..6)
                    .prop_map(Nest::mapping),
                ("[A-Z][a-z]{0,4}", prop::collection::btree_map(key_strategy(), inner, 0..6))
                    .prop_map(|(tag, fields)| Nest::named(tag, fields)),
            ]
        },
    )
}

/// JSON documents without floats. Reserved keys appear only in their
/// encodings or escaped.
fn json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| serde_json::json!(n)),
        "[a-zA-Z0-9_ ]{0,20}".prop_map(Value::String),
    ];
    let key = prop_oneof![
        4 => "\\$?[a-z]{1,8}"
            .prop_filter("bare reserved key", |k| k != "$type" && k != "$tuple"),
        1 => "\\${2,3}(type|tuple)",
    ];
    leaf.prop_recursive(4, 64, 6, move |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(inner.clone(), 0..6)
                .prop_map(|items| serde_json::json!({ "$tuple": items })),
            prop::collection::btree_map(key.clone(), inner.clone(), 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
            ("[A-Z][a-z]{0,4}", prop::collection::btree_map(key.clone(), inner, 0..6)).prop_map(
                |(tag, m)| {
                    let mut object: serde_json::Map<String, Value> = m.into_iter().collect();
                    object.insert("$type".to_string(), Value::String(tag));
                    Value::Object(object)
                }
            ),
        ]
    })
}

fn coin(bits: &mut u64) -> bool {
    *bits ^= *bits << 13;
    *bits ^= *bits >> 7;
    *bits ^= *bits << 17;
    *bits & 1 == 1
}

/// A slim template for `nest`: records keep a seed-chosen subset of their
/// fields, and with a sentinel some containers are replaced by it.
fn thin(nest: &Nest<i64>, bits: &mut u64, sentinel: Option<&Nest<i64>>) -> Nest<i64> {
    if let Some(sentinel) = sentinel {
        if nest.is_nested() && coin(bits) && coin(bits) {
            return sentinel.clone();
        }
    }
    match nest {
        Nest::Leaf(v) => Nest::Leaf(*v),
        Nest::Sequence(items) => Nest::sequence(items.iter().map(|n| thin(n, bits, sentinel))),
        Nest::Tuple(items) => Nest::tuple(items.iter().map(|n| thin(n, bits, sentinel))),
        Nest::Record(r) => {
            let mut kept = Record::new(r.kind().clone());
            for (name, child) in r.canonical() {
                if !coin(bits) {
                    kept.insert(name, thin(child, bits, sentinel));
                }
            }
            Nest::Record(kept)
        }
    }
}

proptest! {
    /// Packing a nest's own leaves back into it reproduces the nest.
    #[test]
    fn flatten_pack_roundtrip(nest in nest_strategy()) {
        let flat: Vec<i64> = pack::flatten(&nest).into_iter().copied().collect();
        let packed = pack::pack_sequence_as(&nest, flat).unwrap();
        prop_assert_eq!(packed, nest);
    }

    /// Leaf counting, borrowed flatten and owned flatten agree.
    #[test]
    fn leaf_count_matches_flatten(nest in nest_strategy()) {
        let borrowed: Vec<i64> = pack::flatten(&nest).into_iter().copied().collect();
        prop_assert_eq!(pack::leaf_count(&nest), borrowed.len());
        prop_assert_eq!(pack::flatten_with_path(&nest).len(), borrowed.len());
        prop_assert_eq!(nest.into_flat(), borrowed);
    }

    /// Congruence is reflexive and symmetric.
    #[test]
    fn congruence_symmetric(a in nest_strategy(), b in nest_strategy()) {
        prop_assert!(structure::assert_same_structure(&a, &a.map(|v| v.to_string())).is_ok());
        prop_assert_eq!(
            structure::assert_same_structure(&a, &b).is_ok(),
            structure::assert_same_structure(&b, &a).is_ok()
        );
    }

    /// Mapping the identity leaves a nest unchanged.
    #[test]
    fn map_identity(nest in nest_strategy()) {
        let mapped = map::map_structure(&[&nest], |v| *v[0]).unwrap();
        prop_assert_eq!(mapped, nest);
    }

    /// Mapping `f` then `g` equals mapping their composition.
    #[test]
    fn map_composition(nest in nest_strategy()) {
        let f = |v: i64| v.wrapping_mul(3);
        let g = |v: i64| v.wrapping_sub(7);
        let inner = map::map_structure(&[&nest], |v| f(*v[0])).unwrap();
        let twice = map::map_structure(&[&inner], |v| g(*v[0])).unwrap();
        let once = map::map_structure(&[&nest], |v| g(f(*v[0]))).unwrap();
        prop_assert_eq!(twice, once);
    }

    /// With the nest as its own shallow nest, every unit is a single leaf.
    #[test]
    fn up_to_with_self_is_flatten(nest in nest_strategy()) {
        let units = up_to::flatten_up_to(&nest, &nest).unwrap();
        let leaves: Vec<Option<&i64>> = units.into_iter().map(Nest::as_leaf).collect();
        let expected: Vec<Option<&i64>> = pack::flatten(&nest).into_iter().map(Some).collect();
        prop_assert_eq!(leaves, expected);

        let mapped =
            up_to::map_structure_up_to(&nest, &[&nest], |u| u[0].as_leaf().copied()).unwrap();
        prop_assert_eq!(mapped, nest.map(|v| Some(*v)));
    }

    /// Pruning against itself is the identity.
    #[test]
    fn prune_self_is_identity(nest in nest_strategy()) {
        let once = prune::prune_nest_like(&nest, &nest, None).unwrap();
        prop_assert_eq!(once, nest);
    }

    /// Pruning to a subset template takes its shape, and pruning twice equals
    /// pruning once, with or without a sentinel.
    #[test]
    fn prune_idempotent(
        nest in nest_strategy(),
        seed in any::<u64>(),
        with_sentinel in any::<bool>(),
    ) {
        let sentinel = Nest::tuple([Nest::leaf(i64::MIN)]);
        let sentinel = with_sentinel.then_some(&sentinel);
        let mut bits = seed | 1;
        let slim = thin(&nest, &mut bits, sentinel);

        let once = prune::prune_nest_like(&nest, &slim, sentinel).unwrap();
        prop_assert!(structure::assert_same_structure(&once, &slim).is_ok());
        let twice = prune::prune_nest_like(&once, &slim, sentinel).unwrap();
        prop_assert_eq!(twice, once);
    }

    /// Every field name found by search is a real field somewhere.
    #[test]
    fn find_field_without_filter_finds_get_field(nest in nest_strategy()) {
        if let Some(record) = nest.as_record() {
            for name in record.field_names() {
                let direct = field::get_field(&nest, name).unwrap();
                let found = field::find_field(&nest, name, false);
                prop_assert!(found.contains(&direct));
            }
        }
    }

    /// JSON documents survive conversion to a nest and back.
    #[test]
    fn json_roundtrip(value in json_strategy()) {
        prop_assert_eq!(to_json(&from_json(&value)), value);
    }

    /// Nests with scalar leaves survive conversion to JSON and back, whatever
    /// their field names.
    #[test]
    fn nest_json_roundtrip(nest in nest_strategy()) {
        let nest = nest.map(|v| {
            if v % 2 == 0 {
                serde_json::json!(v)
            } else {
                Value::String(v.to_string())
            }
        });
        prop_assert_eq!(from_json(&to_json(&nest)), nest);
    }
}
