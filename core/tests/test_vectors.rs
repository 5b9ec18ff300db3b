//! Verify case conversion, URL resolution and failure normalization against
//! JSON test vectors stored in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! formatting differences; key order is still checked because `Value` keeps
//! insertion order.

use piggy_core::{to_camel_case, to_snake_case, ApiClient, ApiConfig, ClientError, HttpMethod, HttpResponse, UreqTransport};
use serde_json::Value;

fn load(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

fn opt_str(value: &Value) -> Option<&str> {
    value.as_str()
}

// ---------------------------------------------------------------------------
// Case conversion
// ---------------------------------------------------------------------------

#[test]
fn case_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/case.json"));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        assert_eq!(to_camel_case(&case["snake"]), case["camel"], "{name}: snake -> camel");
        assert_eq!(to_snake_case(&case["camel"]), case["snake"], "{name}: camel -> snake");
    }

    for case in vectors["to_camel_only"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        assert_eq!(to_camel_case(&case["input"]), case["expected"], "{name}");
    }

    for case in vectors["to_snake_only"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        assert_eq!(to_snake_case(&case["input"]), case["expected"], "{name}");
    }
}

// ---------------------------------------------------------------------------
// URL resolution
// ---------------------------------------------------------------------------

#[test]
fn resolve_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/resolve.json"));

    for config_case in vectors["configs"].as_array().unwrap() {
        let config_name = config_case["name"].as_str().unwrap();
        let config = ApiConfig::from_parts(opt_str(&config_case["version"]), opt_str(&config_case["base_path"]));

        for case in config_case["cases"].as_array().unwrap() {
            let path = case["path"].as_str().unwrap();
            let expected = case["expected"].as_str().unwrap();
            assert_eq!(config.resolve(path), expected, "{config_name}: {path}");
        }
    }
}

// ---------------------------------------------------------------------------
// Failure normalization
// ---------------------------------------------------------------------------

#[test]
fn failure_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/failures.json"));
    let client = ApiClient::new(ApiConfig::default(), UreqTransport::new());

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let path = case["path"].as_str().unwrap();
        let sim = &case["response"];

        let mut response = HttpResponse::new(
            sim["status"].as_u64().unwrap() as u16,
            sim["body"].as_str().unwrap(),
        );
        if let Some(content_type) = sim["content_type"].as_str() {
            response = response.with_header("content-type", content_type);
        }

        let err = match client.parse_response(HttpMethod::Get, path, response) {
            Err(ClientError::Api(err)) => err,
            other => panic!("{name}: expected ApiError, got {other:?}"),
        };

        let expected = &case["expected"];
        assert_eq!(u64::from(err.status), expected["status"].as_u64().unwrap(), "{name}: status");
        assert_eq!(err.message, expected["message"].as_str().unwrap(), "{name}: message");
        assert_eq!(err.url, path, "{name}: url");
        let expected_data = match &expected["data"] {
            Value::Null => None,
            other => Some(other.clone()),
        };
        assert_eq!(err.data, expected_data, "{name}: data");
    }
}
