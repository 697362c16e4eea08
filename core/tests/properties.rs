//! Property tests for building and resolving.

use apiclient_core::builder::render_path;
use apiclient_core::{
    ApiClient, ClientConfig, ClientError, Dto, Endpoint, GetObject, HttpMethod, ListObjects,
    MaybeUnset, ObjectDto, ParsedResult, RawResponse, StatusTable,
};
use proptest::prelude::*;
use serde_json::{Map, Value};

const QUERY_KEYS: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

/// Endpoint whose query parameters are supplied by the test.
struct Probe {
    query: Vec<(&'static str, MaybeUnset<String>)>,
}

impl Endpoint for Probe {
    type Output = ();
    type Error = ();
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "/probe";

    fn query_params(&self) -> Vec<(&'static str, MaybeUnset<String>)> {
        self.query.clone()
    }

    fn status_table() -> StatusTable<(), ()> {
        StatusTable::new()
    }
}

fn lenient() -> ApiClient {
    ApiClient::new(ClientConfig::new("http://localhost:3000"))
}

fn strict() -> ApiClient {
    ApiClient::new(ClientConfig::new("http://localhost:3000").with_raise_on_unexpected_status(true))
}

fn object_strategy() -> impl Strategy<Value = ObjectDto> {
    (
        "[a-z0-9]{1,12}",
        proptest::option::of(proptest::option::of("[ -~]{0,16}")),
        proptest::option::of(proptest::option::of(proptest::collection::vec("[a-z]{1,6}", 0..4))),
    )
        .prop_map(|(id, name, tags)| {
            let mut object = ObjectDto::new(id);
            object.name = name.map_or(MaybeUnset::Unset, MaybeUnset::Set);
            object.tags = tags.map_or(MaybeUnset::Unset, MaybeUnset::Set);
            object
        })
}

proptest! {
    #[test]
    fn rendered_path_has_no_placeholders(values in proptest::collection::vec(any::<String>(), 1..6)) {
        let names: Vec<String> = (0..values.len()).map(|i| format!("p{i}")).collect();
        let template: String = names.iter().map(|name| format!("/seg/{{{name}}}")).collect();
        let params: Vec<(&str, String)> = names
            .iter()
            .map(String::as_str)
            .zip(values.iter().cloned())
            .collect();

        let rendered = render_path(&template, &params).unwrap();
        prop_assert!(!rendered.contains('{'), "rendered contains '{{'");
        prop_assert!(!rendered.contains('}'), "rendered contains '}}'");
    }

    #[test]
    fn unset_query_keys_never_transmitted(flags in proptest::collection::vec(proptest::option::of("[a-z]{0,5}"), 4)) {
        let query: Vec<(&'static str, MaybeUnset<String>)> = QUERY_KEYS
            .iter()
            .zip(flags.iter())
            .map(|(key, value)| (*key, value.clone().map_or(MaybeUnset::Unset, MaybeUnset::Set)))
            .collect();
        let req = lenient().build(&Probe { query }).unwrap();
        let url = req.full_url();
        let sent: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();

        for (key, value) in QUERY_KEYS.iter().zip(flags.iter()) {
            prop_assert_eq!(sent.iter().any(|k| k == key), value.is_some());
        }
    }

    #[test]
    fn list_success_keeps_length_order_and_round_trips(objects in proptest::collection::vec(object_strategy(), 0..8)) {
        let content = serde_json::to_vec(&objects).unwrap();
        let parsed = lenient()
            .resolve::<ListObjects>(&RawResponse::new(200, content))
            .unwrap();
        let decoded = parsed.success().unwrap();
        prop_assert_eq!(decoded.len(), objects.len());
        prop_assert_eq!(&decoded, &objects);

        for object in &objects {
            let back = ObjectDto::from_dict(object.to_dict().unwrap()).unwrap();
            prop_assert_eq!(&back, object);
        }
    }

    #[test]
    fn undocumented_status_preserves_content(
        status in (100u16..600).prop_filter("documented", |s| ![200, 400, 404, 500].contains(s)),
        content in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let response = RawResponse::new(status, content.clone());

        let parsed = lenient().resolve::<GetObject>(&response).unwrap();
        match parsed {
            ParsedResult::Unexpected { status: got, content: body } => {
                prop_assert_eq!(got, status);
                prop_assert_eq!(&body[..], &content[..]);
            }
            other => prop_assert!(false, "expected Unexpected, got {:?}", other.kind()),
        }

        let err = strict().resolve::<GetObject>(&response).unwrap_err();
        match err {
            ClientError::UnexpectedStatus { status: got, content: body } => {
                prop_assert_eq!(got, status);
                prop_assert_eq!(&body[..], &content[..]);
            }
            other => prop_assert!(false, "expected UnexpectedStatus, got {:?}", other),
        }
    }

    #[test]
    fn unknown_keys_are_kept_exactly(
        id in "[a-z0-9]{1,8}",
        extras in proptest::collection::btree_map("x_[a-z]{1,6}", any::<i64>(), 0..6),
    ) {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::String(id.clone()));
        let expected: Map<String, Value> = extras
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(*v)))
            .collect();
        map.extend(expected.clone());

        let object = ObjectDto::from_dict(map).unwrap();
        prop_assert_eq!(object.id, id);
        prop_assert_eq!(object.additional_properties, expected);
    }

    #[test]
    fn resolving_twice_yields_equal_results(
        status in prop_oneof![Just(200u16), Just(404u16), Just(418u16)],
        message in "[a-z ]{0,12}",
    ) {
        let body = match status {
            200 => format!(r#"{{"id":"{}"}}"#, message.replace(' ', "_")),
            _ => format!(r#"{{"message":"{message}"}}"#),
        };
        let response = RawResponse::new(status, body);
        let client = lenient();
        let first = client.resolve::<GetObject>(&response).unwrap();
        let second = client.resolve::<GetObject>(&response).unwrap();
        prop_assert_eq!(first, second);
    }
}
