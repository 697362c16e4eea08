//! DTO contract shared by request bodies and response payloads.
//!
//! # Design
//! A DTO is any serde type. Forward compatibility comes from a
//! `#[serde(flatten)] additional_properties: Map<String, Value>` field on each
//! DTO: keys the struct does not declare are kept there on decode and written
//! back on encode, so a server adding fields never breaks a client.
//!
//! `MaybeUnset<T>` is the "caller did not specify" sentinel. It is distinct
//! from `None`: `MaybeUnset::Set(None)` serializes as JSON `null`, while
//! `MaybeUnset::Unset` is skipped entirely when the field carries
//! `#[serde(default, skip_serializing_if = "MaybeUnset::is_unset")]`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Optional value that remembers whether the caller supplied it at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaybeUnset<T> {
    Unset,
    Set(T),
}

impl<T> MaybeUnset<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, MaybeUnset::Unset)
    }

    pub fn is_set(&self) -> bool {
        !self.is_unset()
    }

    pub fn as_ref(&self) -> MaybeUnset<&T> {
        match self {
            MaybeUnset::Unset => MaybeUnset::Unset,
            MaybeUnset::Set(value) => MaybeUnset::Set(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MaybeUnset<U> {
        match self {
            MaybeUnset::Unset => MaybeUnset::Unset,
            MaybeUnset::Set(value) => MaybeUnset::Set(f(value)),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            MaybeUnset::Unset => None,
            MaybeUnset::Set(value) => Some(value),
        }
    }
}

impl<T> Default for MaybeUnset<T> {
    fn default() -> Self {
        MaybeUnset::Unset
    }
}

impl<T> From<T> for MaybeUnset<T> {
    fn from(value: T) -> Self {
        MaybeUnset::Set(value)
    }
}

impl<T: Serialize> Serialize for MaybeUnset<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MaybeUnset::Set(value) => value.serialize(serializer),
            MaybeUnset::Unset => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for MaybeUnset<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(MaybeUnset::Set)
    }
}

/// `to_dict` / `from_dict` over serde, for any serializable type.
pub trait Dto: Serialize + DeserializeOwned {
    /// Encode into a JSON object. Non-object encodings are rejected.
    fn to_dict(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Decode from a JSON object, keeping unknown keys where the type allows.
    fn from_dict(map: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(map))
    }
}

impl<T: Serialize + DeserializeOwned> Dto for T {}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Patch {
        #[serde(default, skip_serializing_if = "MaybeUnset::is_unset")]
        label: MaybeUnset<Option<String>>,
        #[serde(flatten)]
        additional_properties: Map<String, Value>,
    }

    #[test]
    fn unset_field_is_omitted() {
        let patch = Patch {
            label: MaybeUnset::Unset,
            additional_properties: Map::new(),
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({}));
    }

    #[test]
    fn explicit_null_is_kept() {
        let patch = Patch {
            label: MaybeUnset::Set(None),
            additional_properties: Map::new(),
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"label": null}));

        let back: Patch = serde_json::from_value(json!({"label": null})).unwrap();
        assert_eq!(back.label, MaybeUnset::Set(None));
        let absent: Patch = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.label, MaybeUnset::Unset);
    }

    #[test]
    fn unknown_keys_land_in_additional_properties() {
        let map = json!({"label": "a", "revision": 7, "owner": {"id": "u1"}});
        let patch = Patch::from_dict(map.as_object().unwrap().clone()).unwrap();
        assert_eq!(patch.label, MaybeUnset::Set(Some("a".to_string())));
        assert_eq!(patch.additional_properties.len(), 2);
        assert_eq!(patch.additional_properties["revision"], json!(7));
        assert_eq!(patch.additional_properties["owner"], json!({"id": "u1"}));

        let dict = patch.to_dict().unwrap();
        assert_eq!(Value::Object(dict), map);
    }

    #[test]
    fn to_dict_rejects_non_objects() {
        let err = vec![1, 2].to_dict().unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn maybe_unset_helpers() {
        let set: MaybeUnset<u32> = 4.into();
        assert!(set.is_set());
        assert_eq!(set.map(|v| v * 2).into_option(), Some(8));
        assert_eq!(MaybeUnset::<u32>::default().into_option(), None);
    }
}
