//! Tests for the file sender

use super::*;
use crate::test_util::container_with_metrics;
use serde_json::json;

#[tokio::test]
async fn appends_one_json_line_per_container() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.jsonl");
    let sender = FileSender::new(&path);

    sender.send(container_with_metrics(1)).await.unwrap();
    sender.send(container_with_metrics(2)).await.unwrap();
    sender.close().await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);

    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["metrics"][1]["data"]["n"], json!(1));
}

#[tokio::test]
async fn reopens_after_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.jsonl");
    let sender = FileSender::new(&path);

    sender.send(container_with_metrics(1)).await.unwrap();
    sender.close().await.unwrap();
    sender.send(container_with_metrics(1)).await.unwrap();
    sender.close().await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[tokio::test]
async fn missing_directory_is_a_send_error() {
    let sender = FileSender::new("/nonexistent-dir/metrics.jsonl");
    let err = sender.send(container_with_metrics(1)).await.unwrap_err();
    assert!(matches!(err, SendError::Io(_)));
}

#[tokio::test]
async fn factory_requires_a_path() {
    let refs = RefTable::new();
    let err = FileFactory.create(&RawOptions::new(), &refs).unwrap_err();
    assert!(matches!(err, SendError::Config(_)));
}
