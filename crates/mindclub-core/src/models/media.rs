use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Content-prefix marker distinguishing an embedded payload from a plain URL.
pub const INLINE_MEDIA_PREFIX: &str = "data:";

pub const URL_KEY: &str = "url";
pub const FILE_ID_KEY: &str = "fileId";

/// Durable pointer to an object held by the remote media store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaReference {
    pub url: String,
    pub file_id: String,
}

impl MediaReference {
    pub fn new(url: impl Into<String>, file_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            file_id: file_id.into(),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(URL_KEY.to_string(), Value::String(self.url.clone()));
        map.insert(FILE_ID_KEY.to_string(), Value::String(self.file_id.clone()));
        Value::Object(map)
    }
}

/// Size cap applied to images found at a media path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageClass {
    /// Ordinary content images (banners, galleries, thumbnails)
    Standard,
    /// Profile pictures, capped to a small square
    Avatar,
}

/// How a value found at a declared media location must be treated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaField<'a> {
    /// New embedded payload awaiting upload
    Inline(&'a str),
    /// Object whose `url` sub-field holds (possibly nested) inline media;
    /// sibling keys such as a caption must survive resolution
    Wrapper(&'a Map<String, Value>),
    /// Anything else: stored references, plain URLs, nulls
    Passthrough,
}

impl<'a> MediaField<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::String(s) if is_inline(s) => MediaField::Inline(s),
            Value::Object(map) => match map.get(URL_KEY) {
                Some(url) if contains_inline(url) => MediaField::Wrapper(map),
                _ => MediaField::Passthrough,
            },
            _ => MediaField::Passthrough,
        }
    }

    pub fn needs_upload(&self) -> bool {
        !matches!(self, MediaField::Passthrough)
    }
}

pub fn is_inline(value: &str) -> bool {
    value.starts_with(INLINE_MEDIA_PREFIX)
}

fn contains_inline(value: &Value) -> bool {
    match value {
        Value::String(s) => is_inline(s),
        Value::Object(map) => map.get(URL_KEY).map(contains_inline).unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_inline_string() {
        let value = json!("data:image/png;base64,iVBORw0KGgo=");
        assert!(matches!(MediaField::classify(&value), MediaField::Inline(_)));
    }

    #[test]
    fn test_classify_existing_reference_passes_through() {
        let value = json!({"url": "https://ik.imagekit.io/demo/a.jpg", "fileId": "abc"});
        assert_eq!(MediaField::classify(&value), MediaField::Passthrough);
    }

    #[test]
    fn test_classify_wrapper_with_inline_url() {
        let value = json!({"url": "data:image/jpeg;base64,/9j/", "caption": "Sunrise"});
        match MediaField::classify(&value) {
            MediaField::Wrapper(map) => assert_eq!(map["caption"], "Sunrise"),
            other => panic!("expected wrapper, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_nested_wrapper() {
        let value = json!({"url": {"url": "data:video/mp4;base64,AAAA"}, "name": "clip"});
        assert!(MediaField::classify(&value).needs_upload());
    }

    #[test]
    fn test_plain_url_and_null_pass_through() {
        assert_eq!(
            MediaField::classify(&json!("https://cdn.example.com/a.png")),
            MediaField::Passthrough
        );
        assert_eq!(MediaField::classify(&Value::Null), MediaField::Passthrough);
    }

    #[test]
    fn test_reference_serializes_with_camel_case_file_id() {
        let reference = MediaReference::new("https://cdn/x.jpg", "file_1");
        assert_eq!(
            reference.to_value(),
            serde_json::to_value(&reference).unwrap()
        );
        assert_eq!(reference.to_value()["fileId"], "file_1");
    }
}
