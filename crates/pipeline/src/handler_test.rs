//! Tests for the handler

use super::*;
use serde_json::json;
use sluice_core::{Container, JsonParser, SendFuture};
use sluice_transform::{DataConfig, DataTransformer, MetadataConfig, MetadataTransformer};

/// Sender that records every container it receives.
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

fn metadata_transformer(options: serde_json::Value) -> Arc<dyn sluice_transform::Transformer> {
    let config: MetadataConfig = serde_json::from_value(options).unwrap();
    Arc::new(MetadataTransformer::new(config))
}

fn handler(chain: Chain, sender: Arc<CollectingSender>) -> Handler {
    Handler::new(Arc::new(JsonParser), chain, sender)
}

#[tokio::test]
async fn passthrough_reaches_the_sender() {
    let sender = CollectingSender::new();
    let handler = handler(Chain::empty(), sender.clone());

    handler
        .handle(br#"{"metrics":[{"data":{"x":1}}]}"#)
        .await
        .unwrap();

    let received = sender.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].metric_count(), 1);
    assert_eq!(received[0].metrics[0].data.as_ref().unwrap()["x"], json!(1));
    assert!(received[0].metrics[0].metadata.is_none());
}

#[tokio::test]
async fn parse_failure_reaches_nothing() {
    let sender = CollectingSender::new();
    let handler = handler(Chain::empty(), sender.clone());

    let err = handler.handle(b"not json").await.unwrap_err();
    assert!(matches!(err, HandlerError::Parse(_)));
    assert!(sender.received().is_empty());
}

#[tokio::test]
async fn transform_failure_drops_the_container() {
    let sender = CollectingSender::new();
    let chain = Chain::new(vec![metadata_transformer(json!({"require": ["host"]}))]);
    let handler = handler(chain, sender.clone());

    let err = handler
        .handle(br#"{"metrics":[{"data":{"x":1}}]}"#)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HandlerError::Transform(TransformError::MissingField { .. })
    ));
    assert!(sender.received().is_empty());
}

#[tokio::test]
async fn transformers_run_in_declared_order() {
    // Copy host out of data, then rename it; the sender sees final names.
    let sender = CollectingSender::new();
    let chain = Chain::new(vec![
        metadata_transformer(json!({"copy_from_data": [{"source": "host"}]})),
        metadata_transformer(json!({"rename": [{"source": "host", "destination": "node"}]})),
    ]);
    let handler = handler(chain, sender.clone());

    handler
        .handle(br#"{"metrics":[{"data":{"host":"h1","v":42}}]}"#)
        .await
        .unwrap();

    let received = sender.received();
    let metric = &received[0].metrics[0];
    let metadata = metric.metadata.as_ref().unwrap();
    assert_eq!(metadata["node"], json!("h1"));
    assert!(!metadata.contains_key("host"));
    assert_eq!(metric.data.as_ref().unwrap()["v"], json!(42));
}

#[tokio::test]
async fn data_flatten_scenario() {
    let sender = CollectingSender::new();
    let config: DataConfig = serde_json::from_value(json!({"flatten": [["net"]]})).unwrap();
    let chain = Chain::new(vec![Arc::new(DataTransformer::new(config))]);
    let handler = handler(chain, sender.clone());

    handler
        .handle(br#"{"metrics":[{"data":{"net":{"rx":10,"tx":20}}}]}"#)
        .await
        .unwrap();

    let received = sender.received();
    let data = received[0].metrics[0].data.as_ref().unwrap();
    assert_eq!(data["net__rx"], json!(10));
    assert_eq!(data["net__tx"], json!(20));
    assert!(!data.contains_key("net"));
}

#[tokio::test]
async fn order_is_preserved_end_to_end() {
    let sender = CollectingSender::new();
    let chain = Chain::new(vec![metadata_transformer(json!({"set": {"seen": true}}))]);
    let handler = handler(chain, sender.clone());

    handler
        .handle(br#"{"metrics":[{"data":{"n":0}},{"data":{"n":1}},{"data":{"n":2}}]}"#)
        .await
        .unwrap();

    let received = sender.received();
    for (index, metric) in received[0].metrics.iter().enumerate() {
        assert_eq!(metric.data.as_ref().unwrap()["n"], json!(index));
    }
}

#[tokio::test]
async fn unresolved_handler_ref_fails() {
    let reference = HandlerRef::unresolved("missing");
    let err = reference.handle(b"{}").await.unwrap_err();
    assert!(matches!(err, HandlerError::Unresolved(name) if name == "missing"));
}

#[tokio::test]
async fn handler_table_shares_and_resolves() {
    let table = HandlerTable::new();
    let from_receiver = table.get("h");
    assert_eq!(table.unresolved(), vec!["h".to_string()]);

    let sender = CollectingSender::new();
    table.resolve(
        "h",
        Arc::new(handler(Chain::empty(), sender.clone())),
    );
    assert!(table.unresolved().is_empty());

    from_receiver
        .handle(br#"{"metrics":[{}]}"#)
        .await
        .unwrap();
    assert_eq!(sender.received().len(), 1);
}
