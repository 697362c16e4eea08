//! DTOs for the objects API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch schema drift. Every DTO keeps undeclared keys in
//! `additional_properties`, so fields added by a newer server survive a
//! decode/encode cycle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dto::MaybeUnset;

/// A stored object returned by the API. `name` and `tags` may be absent or
/// explicitly `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDto {
    pub id: String,
    #[serde(default, skip_serializing_if = "MaybeUnset::is_unset")]
    pub name: MaybeUnset<Option<String>>,
    #[serde(default, skip_serializing_if = "MaybeUnset::is_unset")]
    pub tags: MaybeUnset<Option<Vec<String>>>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

impl ObjectDto {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: MaybeUnset::Unset,
            tags: MaybeUnset::Unset,
            additional_properties: Map::new(),
        }
    }
}

/// Request payload for creating an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateObjectBody {
    pub name: String,
    #[serde(default, skip_serializing_if = "MaybeUnset::is_unset")]
    pub tags: MaybeUnset<Vec<String>>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

impl CreateObjectBody {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: MaybeUnset::Unset,
            additional_properties: Map::new(),
        }
    }
}

/// Request payload for patching an object. Unset fields are left untouched
/// on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateObjectBody {
    #[serde(default, skip_serializing_if = "MaybeUnset::is_unset")]
    pub name: MaybeUnset<String>,
    #[serde(default, skip_serializing_if = "MaybeUnset::is_unset")]
    pub tags: MaybeUnset<Vec<String>>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

/// Error body the API documents for 400, 404 and 500.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiHttpError {
    pub message: String,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

impl ApiHttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            additional_properties: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::Dto;
    use serde_json::json;

    #[test]
    fn object_with_only_id() {
        let obj: ObjectDto = serde_json::from_value(json!({"id": "abc"})).unwrap();
        assert_eq!(obj, ObjectDto::new("abc"));
        assert_eq!(serde_json::to_value(&obj).unwrap(), json!({"id": "abc"}));
    }

    #[test]
    fn object_keeps_server_added_fields() {
        let wire = json!({"id": "o1", "name": "n", "revision": 3, "labels": {"a": "b"}});
        let obj = ObjectDto::from_dict(wire.as_object().unwrap().clone()).unwrap();
        assert_eq!(obj.name, MaybeUnset::Set(Some("n".to_string())));
        assert_eq!(obj.tags, MaybeUnset::Unset);
        let mut extra: Vec<&str> = obj.additional_properties.keys().map(String::as_str).collect();
        extra.sort_unstable();
        assert_eq!(extra, ["labels", "revision"]);
        assert_eq!(Value::Object(obj.to_dict().unwrap()), wire);
    }

    #[test]
    fn object_null_fields_differ_from_absent() {
        let wire = json!({"id": "o1", "name": null});
        let obj: ObjectDto = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(obj.name, MaybeUnset::Set(None));
        assert_eq!(obj.tags, MaybeUnset::Unset);
        assert_eq!(serde_json::to_value(&obj).unwrap(), wire);
    }

    #[test]
    fn object_requires_id() {
        assert!(serde_json::from_value::<ObjectDto>(json!({"name": "n"})).is_err());
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        let body = UpdateObjectBody::default();
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({}));
    }

    #[test]
    fn create_body_carries_extra_fields() {
        let mut body = CreateObjectBody::new("widget");
        body.additional_properties
            .insert("color".to_string(), json!("red"));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"name": "widget", "color": "red"})
        );
    }

    #[test]
    fn api_error_parses_message() {
        let err: ApiHttpError = serde_json::from_str(r#"{"message":"not found"}"#).unwrap();
        assert_eq!(err, ApiHttpError::new("not found"));
    }
}
