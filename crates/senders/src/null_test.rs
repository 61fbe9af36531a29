//! Tests for the null sender

use super::*;
use crate::test_util::container_with_metrics;

#[tokio::test]
async fn discards_and_counts() {
    let null = NullSender::new();

    null.send(container_with_metrics(3)).await.unwrap();
    null.send(container_with_metrics(2)).await.unwrap();

    assert_eq!(null.containers(), 2);
    assert_eq!(null.metrics(), 5);
}

#[tokio::test]
async fn factory_needs_no_options() {
    let refs = RefTable::new();
    let sender = NullFactory.create(&RawOptions::new(), &refs).unwrap();
    assert_eq!(sender.name(), "null");
    sender.close().await.unwrap();
}
