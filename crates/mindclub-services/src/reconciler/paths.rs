//! Expansion of declared media paths against a concrete document.

use mindclub_core::models::{ImageClass, MediaField, MediaPath, PathSegment};
use serde_json::Value;

/// A media location found in a document that holds something to upload
#[derive(Debug, Clone, PartialEq)]
pub struct MediaTarget {
    /// JSON Pointer to the value, e.g. `/itinerary/0/activities/1/image/imageOrVideo`
    pub pointer: String,
    pub class: ImageClass,
}

fn escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Every location matched by `path` whose value needs an upload, in document order.
/// Missing or null intermediate nodes end the walk for that branch.
pub fn pending_targets(document: &Value, path: &MediaPath) -> Vec<MediaTarget> {
    let mut found = Vec::new();
    walk(document, path.segments(), String::new(), path.class(), &mut found);
    found
}

fn walk(
    node: &Value,
    segments: &[PathSegment],
    pointer: String,
    class: ImageClass,
    found: &mut Vec<MediaTarget>,
) {
    let Some((segment, rest)) = segments.split_first() else {
        if MediaField::classify(node).needs_upload() {
            found.push(MediaTarget { pointer, class });
        }
        return;
    };

    match segment {
        PathSegment::Key(key) => {
            if let Some(child) = node.get(key.as_str()) {
                walk(child, rest, format!("{}/{}", pointer, escape(key)), class, found);
            }
        }
        PathSegment::Each(key) => {
            if let Some(Value::Array(items)) = node.get(key.as_str()) {
                let base = format!("{}/{}", pointer, escape(key));
                for (index, item) in items.iter().enumerate() {
                    walk(item, rest, format!("{}/{}", base, index), class, found);
                }
            }
        }
    }
}
