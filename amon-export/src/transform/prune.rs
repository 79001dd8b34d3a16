use serde_json::{Map, Value};

/// What to do with objects left empty after their keys were pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyObjects {
    #[default]
    Keep,
    Drop,
}

/// Drop every object key whose value is `null`, `false` or an empty array.
///
/// The exchange format reads a missing key as "unknown", so these values
/// must not be sent as explicit falsy data. Empty strings and zeros are
/// real values and stay. Objects inside arrays are pruned too.
pub fn prune(value: &Value) -> Value {
    prune_with(value, EmptyObjects::Keep)
}

pub fn prune_with(value: &Value, empty_objects: EmptyObjects) -> Value {
    match value {
        Value::Object(map) => Value::Object(prune_map(map, empty_objects)),
        Value::Array(items) => {
            Value::Array(items.iter().map(|v| prune_with(v, empty_objects)).collect())
        }
        other => other.clone(),
    }
}

fn prune_map(map: &Map<String, Value>, empty_objects: EmptyObjects) -> Map<String, Value> {
    let mut out = Map::with_capacity(map.len());
    for (key, value) in map {
        if is_absent(value) {
            continue;
        }
        let pruned = prune_with(value, empty_objects);
        let emptied = matches!(&pruned, Value::Object(m) if m.is_empty());
        if empty_objects == EmptyObjects::Drop && emptied {
            continue;
        }
        out.insert(key.clone(), pruned);
    }
    out
}

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
