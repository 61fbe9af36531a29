//! Tests for the file receivers

use super::*;
use sluice_core::{Container, JsonParser, SendFuture, Sender};
use sluice_pipeline::Handler;
use sluice_transform::Chain;
use std::io::Write;
use std::sync::Mutex;

#[derive(Default)]
struct CollectingSender {
    received: Mutex<Vec<Arc<Container>>>,
}

impl CollectingSender {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn received(&self) -> Vec<Arc<Container>> {
        self.received.lock().unwrap().clone()
    }
}

impl Sender for CollectingSender {
    fn send(&self, container: Arc<Container>) -> SendFuture<'_> {
        Box::pin(async move {
            self.received.lock().unwrap().push(container);
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "collecting"
    }
}

fn resolved_handler(sender: Arc<CollectingSender>) -> Arc<HandlerRef> {
    let reference = Arc::new(HandlerRef::unresolved("h"));
    reference.resolve(Arc::new(Handler::new(
        Arc::new(JsonParser),
        Chain::empty(),
        sender,
    )));
    reference
}

#[tokio::test]
async fn file_receiver_reads_each_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, r#"{{"metrics":[{{"data":{{"n":0}}}}]}}"#).unwrap();
    writeln!(file, r#"{{"metrics":[{{"data":{{"n":1}}}}]}}"#).unwrap();
    drop(file);

    let sender = CollectingSender::new();
    let receiver = FileReceiver::new(&path, resolved_handler(sender.clone()));
    receiver.start().await.unwrap();

    let received = sender.received();
    assert_eq!(received.len(), 2);
    assert_eq!(
        received[1].metrics[0].data.as_ref().unwrap()["n"],
        serde_json::json!(1)
    );
}

#[tokio::test]
async fn bad_lines_are_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "not json at all").unwrap();
    writeln!(file, r#"{{"metrics":[{{"data":{{"n":1}}}}]}}"#).unwrap();
    drop(file);

    let sender = CollectingSender::new();
    let receiver = FileReceiver::new(&path, resolved_handler(sender.clone()));
    receiver.start().await.unwrap();

    assert_eq!(sender.received().len(), 1);
}

#[tokio::test]
async fn empty_lines_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file).unwrap();
    writeln!(file, r#"{{"metrics":[{{}}]}}"#).unwrap();
    drop(file);

    let sender = CollectingSender::new();
    let receiver = FileReceiver::new(&path, resolved_handler(sender.clone()));
    receiver.start().await.unwrap();

    assert_eq!(sender.received().len(), 1);
}

#[tokio::test]
async fn missing_file_is_fatal() {
    let sender = CollectingSender::new();
    let receiver = FileReceiver::new("/nonexistent/input.jsonl", resolved_handler(sender));
    let err = receiver.start().await.unwrap_err();
    assert!(matches!(err, ReceiverError::Io(_)));
}

#[tokio::test]
async fn wholefile_reads_the_file_as_one_container() {
    // The whole file is a single container, newlines and all.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("container.json");
    std::fs::write(
        &path,
        "{\n  \"metrics\": [\n    {\"data\": {\"n\": 0}},\n    {\"data\": {\"n\": 1}}\n  ]\n}\n",
    )
    .unwrap();

    let sender = CollectingSender::new();
    let receiver = WholeFileReceiver::new(&path, resolved_handler(sender.clone()), None);
    receiver.start().await.unwrap();

    let received = sender.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].metric_count(), 2);
}

#[tokio::test]
async fn wholefile_bad_content_is_logged_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("container.json");
    std::fs::write(&path, "not json").unwrap();

    let sender = CollectingSender::new();
    let receiver = WholeFileReceiver::new(&path, resolved_handler(sender.clone()), None);
    receiver.start().await.unwrap();
    assert!(sender.received().is_empty());
}

#[tokio::test]
async fn wholefile_missing_file_is_fatal_without_frequency() {
    let sender = CollectingSender::new();
    let receiver =
        WholeFileReceiver::new("/nonexistent/container.json", resolved_handler(sender), None);
    let err = receiver.start().await.unwrap_err();
    assert!(matches!(err, ReceiverError::Io(_)));
}

#[tokio::test]
async fn wholefile_frequency_rereads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("container.json");
    std::fs::write(&path, r#"{"metrics":[{"data":{"n":0}}]}"#).unwrap();

    let sender = CollectingSender::new();
    let receiver = WholeFileReceiver::new(
        &path,
        resolved_handler(sender.clone()),
        Some(Duration::from_millis(5)),
    );
    let task = tokio::spawn(async move {
        let _ = receiver.start().await;
    });

    tokio::time::timeout(Duration::from_secs(5), async {
        while sender.received().len() < 3 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    task.abort();

    assert!(sender.received().len() >= 3);
}

#[test]
fn wholefile_options_parse_frequency() {
    let options = serde_json::json!({
        "path": "/tmp/container.json",
        "handler": "h",
        "frequency": "30s"
    });
    let options: WholeFileOptions = serde_json::from_value(options).unwrap();
    assert_eq!(options.frequency, Some(Duration::from_secs(30)));
}

#[test]
fn wholefile_frequency_defaults_to_unset() {
    let options = serde_json::json!({"path": "/tmp/container.json", "handler": "h"});
    let options: WholeFileOptions = serde_json::from_value(options).unwrap();
    assert!(options.frequency.is_none());
}

#[test]
fn linefile_options_parse_delay() {
    let options = serde_json::json!({
        "path": "/tmp/fifo",
        "handler": "h",
        "delay": "250ms"
    });
    let options: LineFileOptions = serde_json::from_value(options).unwrap();
    assert_eq!(options.delay, Duration::from_millis(250));
}

#[test]
fn linefile_delay_defaults_to_zero() {
    let options = serde_json::json!({"path": "/tmp/fifo", "handler": "h"});
    let options: LineFileOptions = serde_json::from_value(options).unwrap();
    assert!(options.delay.is_zero());
}
