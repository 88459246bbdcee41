//! Verify the classifier and normalizer against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use ghibli_core::{classify, normalize, ErrorKind, FilmRecord, HttpResponse, TransportError, UpstreamError};

/// Build the caught error a vector case describes.
fn caught_error(error: &serde_json::Value) -> UpstreamError {
    let message = error["message"].as_str().unwrap().to_string();
    match error["kind"].as_str().unwrap() {
        "transport" => {
            let response = error["status"].as_u64().map(|status| HttpResponse {
                status: status as u16,
                headers: Vec::new(),
                body: String::new(),
            });
            UpstreamError::Transport(TransportError {
                message,
                code: error["code"].as_str().map(str::to_string),
                response,
            })
        }
        "internal" => UpstreamError::Internal(message),
        other => panic!("unknown error kind: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Classify
// ---------------------------------------------------------------------------

#[test]
fn classify_test_vectors() {
    let raw = include_str!("../../test-vectors/classify.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected"];
        let error = caught_error(&case["error"]);

        let classified = classify(&error);
        let expected_kind: ErrorKind = serde_json::from_value(expected["kind"].clone()).unwrap();
        assert_eq!(classified.kind, expected_kind, "{name}: kind");
        assert_eq!(classified.message, expected["message"].as_str().unwrap(), "{name}: message");
        assert_eq!(
            classified.status_code,
            expected["status_code"].as_u64().map(|s| s as u16),
            "{name}: status_code"
        );

        // Same input, same answer.
        assert_eq!(classify(&error), classified, "{name}: repeatable");
    }
}

// ---------------------------------------------------------------------------
// Normalize
// ---------------------------------------------------------------------------

#[test]
fn normalize_test_vectors() {
    let raw = include_str!("../../test-vectors/normalize.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let record: FilmRecord = serde_json::from_value(case["input"].clone()).unwrap();

        let film = normalize(record.clone());
        assert_eq!(film.id, record.id, "{name}: id");
        assert_eq!(film.title, record.title, "{name}: title");

        let actual = serde_json::to_value(&film).unwrap();
        assert_eq!(actual, case["expected"], "{name}: film");
    }
}
