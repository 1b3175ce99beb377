//! Generic walks over any document shape keyed on `fileId`.

use std::collections::{BTreeSet, HashMap};

use mindclub_core::models::{is_inline, FILE_ID_KEY, URL_KEY};
use serde_json::{Map, Value};

/// Every non-empty `fileId` anywhere in the document, regardless of declared paths.
pub fn collect_file_ids(document: &Value) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();
    collect_into(document, &mut ids);
    ids
}

fn collect_into(node: &Value, ids: &mut BTreeSet<String>) {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(id)) = map.get(FILE_ID_KEY) {
                if !id.is_empty() {
                    ids.insert(id.clone());
                }
            }
            for value in map.values() {
                collect_into(value, ids);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_into(item, ids);
            }
        }
        _ => {}
    }
}

/// Remove every `fileId` key; used for responses to non-admin callers.
pub fn strip_file_ids(document: &mut Value) {
    match document {
        Value::Object(map) => {
            map.remove(FILE_ID_KEY);
            for value in map.values_mut() {
                strip_file_ids(value);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(strip_file_ids),
        _ => {}
    }
}

fn stored_url(map: &Map<String, Value>) -> Option<&str> {
    match map.get(URL_KEY) {
        Some(Value::String(url)) if !is_inline(url) => Some(url),
        _ => None,
    }
}

fn references_by_url(document: &Value) -> HashMap<String, String> {
    fn walk(node: &Value, out: &mut HashMap<String, String>) {
        match node {
            Value::Object(map) => {
                if let (Some(url), Some(Value::String(id))) = (stored_url(map), map.get(FILE_ID_KEY)) {
                    if !id.is_empty() {
                        out.insert(url.to_string(), id.clone());
                    }
                }
                map.values().for_each(|v| walk(v, out));
            }
            Value::Array(items) => items.iter().for_each(|v| walk(v, out)),
            _ => {}
        }
    }

    let mut out = HashMap::new();
    walk(document, &mut out);
    out
}

/// Give back the `fileId` of references a client echoed as `{url}` only.
///
/// A reference without a `fileId` whose `url` matches one stored in `stored`
/// regains that id, so untouched media is not taken for an orphan.
pub fn restore_file_ids(stored: &Value, payload: &mut Value) {
    let known = references_by_url(stored);
    if known.is_empty() {
        return;
    }

    fn walk(node: &mut Value, known: &HashMap<String, String>) {
        match node {
            Value::Object(map) => {
                let missing = !matches!(map.get(FILE_ID_KEY), Some(Value::String(id)) if !id.is_empty());
                if missing {
                    if let Some(id) = stored_url(map).and_then(|url| known.get(url)) {
                        map.insert(FILE_ID_KEY.to_string(), Value::String(id.clone()));
                    }
                }
                map.values_mut().for_each(|v| walk(v, known));
            }
            Value::Array(items) => items.iter_mut().for_each(|v| walk(v, known)),
            _ => {}
        }
    }

    walk(payload, &known);
}

/// Drop any `fileId` in `payload` that `stored` does not already reference.
///
/// Applied to self-service writes, where the caller must not be able to
/// claim (and later delete) a file it does not own.
pub fn retain_known_file_ids(stored: &Value, payload: &mut Value) {
    let known = collect_file_ids(stored);

    fn walk(node: &mut Value, known: &BTreeSet<String>) {
        match node {
            Value::Object(map) => {
                let foreign = matches!(map.get(FILE_ID_KEY), Some(Value::String(id)) if !known.contains(id));
                if foreign {
                    map.remove(FILE_ID_KEY);
                }
                map.values_mut().for_each(|v| walk(v, known));
            }
            Value::Array(items) => items.iter_mut().for_each(|v| walk(v, known)),
            _ => {}
        }
    }

    walk(payload, &known);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collect_is_permissive_and_deduplicates() {
        let doc = json!({
            "header": {"image": {"url": "u1", "fileId": "a"}},
            "random": [{"deep": {"fileId": "b"}}, {"fileId": "a"}],
            "empty": {"fileId": ""},
            "notString": {"fileId": 7}
        });
        let ids: Vec<String> = collect_file_ids(&doc).into_iter().collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_strip_removes_every_file_id() {
        let mut doc = json!({"a": {"url": "u", "fileId": "x"}, "b": [{"fileId": "y", "caption": "c"}]});
        strip_file_ids(&mut doc);
        assert_eq!(doc, json!({"a": {"url": "u"}, "b": [{"caption": "c"}]}));
    }

    #[test]
    fn test_restore_matches_by_url() {
        let stored = json!({"avatar": {"url": "https://cdn/a.jpg", "fileId": "a"}});
        let mut payload = json!({
            "avatar": {"url": "https://cdn/a.jpg"},
            "other": {"url": "https://cdn/unknown.jpg"}
        });
        restore_file_ids(&stored, &mut payload);
        assert_eq!(payload["avatar"]["fileId"], "a");
        assert!(payload["other"].get("fileId").is_none());
    }

    #[test]
    fn test_restore_keeps_explicit_file_id() {
        let stored = json!({"img": {"url": "https://cdn/a.jpg", "fileId": "a"}});
        let mut payload = json!({"img": {"url": "https://cdn/a.jpg", "fileId": "z"}});
        restore_file_ids(&stored, &mut payload);
        assert_eq!(payload["img"]["fileId"], "z");
    }

    #[test]
    fn test_retain_drops_foreign_ids() {
        let stored = json!({"avatar": {"url": "u", "fileId": "mine"}});
        let mut payload = json!({"avatar": {"url": "v", "fileId": "someone-elses"}, "x": {"fileId": "mine"}});
        retain_known_file_ids(&stored, &mut payload);
        assert!(payload["avatar"].get("fileId").is_none());
        assert_eq!(payload["x"]["fileId"], "mine");
    }
}
