//! Tests for the JSON parser

use super::*;
use serde_json::json;

#[test]
fn parses_minimal_container() {
    let container = JsonParser
        .parse(br#"{"metrics":[{"data":{"x":1}}]}"#)
        .unwrap();
    assert_eq!(container.metric_count(), 1);
    assert_eq!(container.metrics[0].data.as_ref().unwrap()["x"], json!(1));
    assert!(container.metrics[0].metadata.is_none());
}

#[test]
fn rejects_invalid_json() {
    let err = JsonParser.parse(b"not json").unwrap_err();
    assert!(matches!(err, ParseError::Malformed(_)));
}

#[test]
fn rejects_empty_metrics() {
    let err = JsonParser.parse(br#"{"metrics":[]}"#).unwrap_err();
    assert!(matches!(err, ParseError::NoMetrics));
}

#[test]
fn rejects_missing_metrics() {
    let err = JsonParser.parse(br#"{"template":{}}"#).unwrap_err();
    assert!(matches!(err, ParseError::Malformed(_)));
}

#[test]
fn rejects_bad_timestamp() {
    let err = JsonParser
        .parse(br#"{"metrics":[{"timestamp":"yesterday"}]}"#)
        .unwrap_err();
    assert!(matches!(err, ParseError::Malformed(_)));
}

#[test]
fn preserves_metric_order() {
    let container = JsonParser
        .parse(br#"{"metrics":[{"data":{"n":0}},{"data":{"n":1}},{"data":{"n":2}}]}"#)
        .unwrap();
    for (i, metric) in container.metrics.iter().enumerate() {
        assert_eq!(metric.data.as_ref().unwrap()["n"], json!(i));
    }
}
