//! Take operator implementation
//!
//! Emits only the first `count` values from the source, then completes.
//! Reaching the limit completes downstream first and then tears the
//! upstream down, so an infinite source stops producing.

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
  subscription::{BoxSubscription, ClosedSubscription},
};

#[derive(Clone)]
pub struct TakeOp<S> {
  source: S,
  count: usize,
}

impl<S> TakeOp<S> {
  pub(crate) fn new(source: S, count: usize) -> Self { Self { source, count } }
}

struct TakeObserver<Item> {
  observer: SafeObserver<Item>,
  remaining: AtomicUsize,
}

#[async_trait]
impl<S: Observable> Observable for TakeOp<S> {
  type Item = S::Item;

  async fn actual_subscribe(&self, observer: BoxObserver<S::Item>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    if self.count == 0 {
      safe.complete().await;
      return detach.attach(ClosedSubscription);
    }
    let take = TakeObserver { observer: safe, remaining: AtomicUsize::new(self.count) };
    let upstream = self.source.actual_subscribe(Arc::new(take)).await;
    detach.attach(upstream)
  }
}

#[async_trait]
impl<Item: Send + 'static> Observer<Item> for TakeObserver<Item> {
  async fn next(&self, value: Item) {
    let Ok(before) = self
      .remaining
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
    else {
      return;
    };
    self.observer.next(value).await;
    if before == 1 {
      self.observer.complete().await;
    }
  }

  async fn error(&self, err: RxError) { self.observer.error(err).await }

  async fn complete(&self) { self.observer.complete().await }
}
