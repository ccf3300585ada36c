//! # JSON Bridge
//!
//! Converts between `serde_json::Value` documents and `Nest<Value>`.
//!
//! | JSON                              | Nest                         |
//! |-----------------------------------|------------------------------|
//! | array                             | `Sequence`                   |
//! | `{"$tuple": [...]}`               | `Tuple`                      |
//! | object with string `"$type"`      | `Record` of kind `Named(tag)`|
//! | any other object                  | `Record` of kind `Mapping`   |
//! | scalar or `null`                  | `Leaf`                       |
//!
//! The reserved encodings only apply when well-formed: an object whose
//! `"$tuple"` member is not the sole member or is not an array, or whose
//! `"$type"` member is not a string, is an ordinary mapping.
//!
//! A record field whose name is one or more `$` followed by `tuple` or `type`
//! is written with one extra leading `$`, and reading strips it again, so
//! `from_json(&to_json(&nest)) == nest` for every nest. A bare reserved key
//! that was read as a plain field is written back in the escaped form.
//!
//! ```text
//! mapping {"$type": "T"}   <->   {"$$type": "T"}
//! ```

use serde_json::{Map, Value};

use crate::nest::{Nest, RecordKind};

/// Object key marking a tuple.
pub const TUPLE_KEY: &str = "$tuple";

/// Object key carrying a named record's type tag.
pub const TYPE_KEY: &str = "$type";

/// Convert a JSON document to a nest.
pub fn from_json(value: &Value) -> Nest<Value> {
    match value {
        Value::Array(items) => Nest::sequence(items.iter().map(from_json)),
        Value::Object(map) => object_to_nest(map),
        scalar => Nest::leaf(scalar.clone()),
    }
}

fn object_to_nest(map: &Map<String, Value>) -> Nest<Value> {
    if map.len() == 1 {
        if let Some(Value::Array(items)) = map.get(TUPLE_KEY) {
            return Nest::tuple(items.iter().map(from_json));
        }
    }
    match map.get(TYPE_KEY) {
        Some(Value::String(tag)) => Nest::named(
            tag.as_str(),
            map.iter()
                .filter(|(k, _)| k.as_str() != TYPE_KEY)
                .map(|(k, v)| (unescape_key(k), from_json(v))),
        ),
        _ => Nest::mapping(map.iter().map(|(k, v)| (unescape_key(k), from_json(v)))),
    }
}

/// `$tuple`, `$$type` and the like: a reserved key behind one or more `$`.
fn is_reserved_spelling(name: &str) -> bool {
    let word = name.trim_start_matches('$');
    word.len() < name.len() && [TUPLE_KEY, TYPE_KEY].iter().any(|key| &key[1..] == word)
}

fn escape_key(name: &str) -> String {
    if is_reserved_spelling(name) {
        format!("${name}")
    } else {
        name.to_string()
    }
}

fn unescape_key(key: &str) -> &str {
    match key.strip_prefix('$') {
        Some(rest) if is_reserved_spelling(rest) => rest,
        _ => key,
    }
}

/// Convert a nest back to JSON using the same encodings.
pub fn to_json(nest: &Nest<Value>) -> Value {
    match nest {
        Nest::Leaf(v) => v.clone(),
        Nest::Sequence(items) => Value::Array(items.iter().map(to_json).collect()),
        Nest::Tuple(items) => {
            let mut map = Map::new();
            map.insert(
                TUPLE_KEY.to_string(),
                Value::Array(items.iter().map(to_json).collect()),
            );
            Value::Object(map)
        }
        Nest::Record(r) => {
            let mut map: Map<String, Value> = r
                .iter()
                .map(|(name, child)| (escape_key(name), to_json(child)))
                .collect();
            if let RecordKind::Named(tag) = r.kind() {
                map.insert(TYPE_KEY.to_string(), Value::String(tag.clone()));
            }
            Value::Object(map)
        }
    }
}

impl From<&Value> for Nest<Value> {
    fn from(value: &Value) -> Self {
        from_json(value)
    }
}

impl From<&Nest<Value>> for Value {
    fn from(nest: &Nest<Value>) -> Self {
        to_json(nest)
    }
}
