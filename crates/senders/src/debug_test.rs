//! Tests for the debug sender

use super::*;
use crate::test_util::container_with_metrics;
use serde_json::json;

#[test]
fn renders_pretty_json() {
    let sender = DebugSender::new();
    let container = container_with_metrics(1);

    let rendered = sender.render(&container).unwrap();
    assert!(rendered.contains("\"metrics\""));
    let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(parsed["metrics"][0]["data"]["n"], json!(0));
}

#[tokio::test]
async fn send_succeeds() {
    let sender = DebugSender::with_prefix("debug:");
    sender.send(container_with_metrics(2)).await.unwrap();
}

#[test]
fn factory_parses_prefix() {
    let options = json!({"prefix": "out:"});
    let refs = RefTable::new();
    let sender = DebugFactory
        .create(options.as_object().unwrap(), &refs)
        .unwrap();
    assert_eq!(sender.name(), "debug");
}
