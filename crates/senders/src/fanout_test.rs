//! Tests for the fanout sender

use super::*;
use crate::test_util::{container_with_metrics, CollectingSender};

#[tokio::test]
async fn delivers_to_every_downstream() {
    let first = CollectingSender::new();
    let second = CollectingSender::new();
    let third = CollectingSender::new();
    let fanout = FanoutSender::new(vec![first.clone(), second.clone(), third.clone()]);

    fanout.send(container_with_metrics(1)).await.unwrap();

    assert_eq!(first.send_count(), 1);
    assert_eq!(second.send_count(), 1);
    assert_eq!(third.send_count(), 1);
}

#[tokio::test]
async fn returns_first_error_after_all_complete() {
    let failing = CollectingSender::failing();
    let healthy = CollectingSender::new();
    let fanout = FanoutSender::new(vec![failing, healthy.clone()]);

    let err = fanout.send(container_with_metrics(1)).await.unwrap_err();
    assert!(matches!(err, SendError::Failed(_)));
    // The healthy downstream still got its copy.
    assert_eq!(healthy.send_count(), 1);
}

#[tokio::test]
async fn succeeds_when_all_succeed() {
    let fanout = FanoutSender::new(vec![CollectingSender::new(), CollectingSender::new()]);
    fanout.send(container_with_metrics(1)).await.unwrap();
}

#[tokio::test]
async fn empty_fanout_is_a_noop() {
    let fanout = FanoutSender::new(Vec::new());
    fanout.send(container_with_metrics(1)).await.unwrap();
}

#[tokio::test]
async fn close_propagates_downstream() {
    let downstream = CollectingSender::new();
    let fanout = FanoutSender::new(vec![downstream.clone()]);
    fanout.close().await.unwrap();
    assert_eq!(downstream.close_count(), 1);
}
