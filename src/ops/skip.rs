//! Skip operator implementation
//!
//! Ignores the first `count` values emitted by the source, then emits the
//! rest. If the source completes before emitting `count` values, `skip`
//! completes without emitting any values.

use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use async_trait::async_trait;

use crate::{
  auto_detach::{auto_detach, SafeObserver},
  error::RxError,
  observable::Observable,
  observer::{BoxObserver, Observer},
  subscription::BoxSubscription,
};

#[derive(Clone)]
pub struct SkipOp<S> {
  source: S,
  count: usize,
}

impl<S> SkipOp<S> {
  pub(crate) fn new(source: S, count: usize) -> Self { Self { source, count } }
}

struct SkipObserver<Item> {
  observer: SafeObserver<Item>,
  remaining: AtomicUsize,
}

#[async_trait]
impl<S: Observable> Observable for SkipOp<S> {
  type Item = S::Item;

  async fn actual_subscribe(&self, observer: BoxObserver<S::Item>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let skip = SkipObserver { observer: safe, remaining: AtomicUsize::new(self.count) };
    let upstream = self.source.actual_subscribe(Arc::new(skip)).await;
    detach.attach(upstream)
  }
}

#[async_trait]
impl<Item: Send + 'static> Observer<Item> for SkipObserver<Item> {
  async fn next(&self, value: Item) {
    let skipped = self
      .remaining
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
      .is_ok();
    if !skipped {
      self.observer.next(value).await
    }
  }

  async fn error(&self, err: RxError) { self.observer.error(err).await }

  async fn complete(&self) { self.observer.complete().await }
}
