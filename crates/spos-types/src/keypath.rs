use serde_json::{Map, Value};

// Dot-path access into payload objects. Paths are split on '.' with no
// escaping: keys themselves cannot contain dots.

/// Read the value at `path`, if every segment exists.
#[must_use]
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Write `value` at `path`, creating intermediate objects as needed.
///
/// Non-object values along the way are replaced — the decoder only ever
/// writes into maps it built itself, so nothing user-held is clobbered.
pub fn set(root: &mut Value, path: &str, value: Value) {
    let (parents, last) = match path.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, path),
    };
    let mut current = ensure_object(root);
    if let Some(parents) = parents {
        for segment in parents.split('.') {
            let slot = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = ensure_object(slot);
        }
    }
    current.insert(last.to_string(), value);
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_flat_and_nested() {
        let data = json!({"a": 1, "b": {"c": {"d": 2}}});
        assert_eq!(get(&data, "a"), Some(&json!(1)));
        assert_eq!(get(&data, "b.c.d"), Some(&json!(2)));
        assert_eq!(get(&data, "b.c"), Some(&json!({"d": 2})));
    }

    #[test]
    fn get_missing_segment_is_none() {
        let data = json!({"a": {"b": 1}});
        assert_eq!(get(&data, "a.c"), None);
        assert_eq!(get(&data, "x"), None);
        // descending through a non-object
        assert_eq!(get(&data, "a.b.c"), None);
    }

    #[test]
    fn set_creates_intermediates() {
        let mut data = json!({});
        set(&mut data, "a.b.c", json!(3));
        assert_eq!(data, json!({"a": {"b": {"c": 3}}}));
    }

    #[test]
    fn set_merges_into_existing_objects() {
        let mut data = json!({"a": {"x": 1}});
        set(&mut data, "a.y", json!(2));
        assert_eq!(data, json!({"a": {"x": 1, "y": 2}}));
    }
}
