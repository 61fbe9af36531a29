//! Tests for sender references

use super::*;
use crate::Metric;
use std::sync::atomic::{AtomicU64, Ordering};

struct CountingSender {
    sent: AtomicU64,
    closed: AtomicU64,
}

impl CountingSender {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: AtomicU64::new(0),
            closed: AtomicU64::new(0),
        })
    }
}

impl Sender for CountingSender {
    fn send(&self, _container: Arc<Container>) -> SendFuture<'_> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Ok(()) })
    }

    fn name(&self) -> &'static str {
        "counting"
    }

    fn close(&self) -> SendFuture<'_> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Ok(()) })
    }
}

fn container() -> Arc<Container> {
    Arc::new(Container::new(vec![Metric::default()]))
}

#[tokio::test]
async fn unresolved_ref_fails_send() {
    let reference = SenderRef::unresolved("missing");
    let err = reference.send(container()).await.unwrap_err();
    assert!(matches!(err, SendError::Unresolved(name) if name == "missing"));
}

#[tokio::test]
async fn resolved_ref_delegates() {
    let target = CountingSender::new();
    let reference = SenderRef::unresolved("target");
    assert!(reference.resolve(target.clone()));

    reference.send(container()).await.unwrap();
    reference.close().await.unwrap();

    assert_eq!(target.sent.load(Ordering::SeqCst), 1);
    assert_eq!(target.closed.load(Ordering::SeqCst), 1);
}

#[test]
fn ref_resolves_only_once() {
    let reference = SenderRef::unresolved("target");
    assert!(reference.resolve(CountingSender::new()));
    assert!(!reference.resolve(CountingSender::new()));
}

#[tokio::test]
async fn table_shares_refs_by_name() {
    let table = RefTable::new();
    let first = table.get("out");
    let second = table.get("out");

    let target = CountingSender::new();
    table.resolve("out", target.clone());

    first.send(container()).await.unwrap();
    second.send(container()).await.unwrap();
    assert_eq!(target.sent.load(Ordering::SeqCst), 2);
}

#[test]
fn table_reports_unresolved_names() {
    let table = RefTable::new();
    table.get("a");
    table.get("b");
    table.resolve("b", CountingSender::new());

    assert_eq!(table.unresolved(), vec!["a".to_string()]);
}
