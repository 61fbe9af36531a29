//! Tests for the fallback sender

use super::*;
use crate::test_util::{container_with_metrics, CollectingSender};

#[tokio::test]
async fn first_success_wins() {
    let first = CollectingSender::new();
    let second = CollectingSender::new();
    let fallback = FallbackSender::new(vec![first.clone(), second.clone()]);

    fallback.send(container_with_metrics(1)).await.unwrap();

    assert_eq!(first.send_count(), 1);
    assert_eq!(second.send_count(), 0);
}

#[tokio::test]
async fn falls_through_to_the_next_on_error() {
    let failing = CollectingSender::failing();
    let healthy = CollectingSender::new();
    let fallback = FallbackSender::new(vec![failing.clone(), healthy.clone()]);

    fallback.send(container_with_metrics(1)).await.unwrap();
    assert_eq!(healthy.send_count(), 1);

    // Recovery: once the primary is healthy again it takes over.
    failing.set_failing(false);
    fallback.send(container_with_metrics(1)).await.unwrap();
    assert_eq!(failing.send_count(), 1);
    assert_eq!(healthy.send_count(), 1);
}

#[tokio::test]
async fn aggregates_all_failures() {
    let fallback = FallbackSender::new(vec![
        CollectingSender::failing(),
        CollectingSender::failing(),
    ]);

    let err = fallback.send(container_with_metrics(1)).await.unwrap_err();
    match err {
        SendError::AllFailed(message) => {
            assert_eq!(message.matches("collecting sender set to fail").count(), 2);
        }
        other => panic!("expected AllFailed, got {other}"),
    }
}

#[tokio::test]
async fn close_propagates_to_every_downstream() {
    let first = CollectingSender::new();
    let second = CollectingSender::new();
    let fallback = FallbackSender::new(vec![first.clone(), second.clone()]);

    fallback.close().await.unwrap();
    assert_eq!(first.close_count(), 1);
    assert_eq!(second.close_count(), 1);
}
