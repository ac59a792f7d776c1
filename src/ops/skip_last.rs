use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
  auto_detach::{auto_detach, SafeObserver},
  error::RxError,
  observable::Observable,
  observer::{BoxObserver, Observer},
  subscription::BoxSubscription,
};

/// Ignores the last `count` values.
///
/// Values are held back in a queue of `count` entries; a value is emitted
/// once `count` newer values arrived behind it. Whatever the queue still
/// holds when the source completes is discarded.
#[derive(Clone)]
pub struct SkipLastOp<S> {
  source: S,
  count: usize,
}

impl<S> SkipLastOp<S> {
  pub(crate) fn new(source: S, count: usize) -> Self { Self { source, count } }
}

struct SkipLastObserver<Item> {
  observer: SafeObserver<Item>,
  count: usize,
  queue: Mutex<VecDeque<Item>>,
}

#[async_trait]
impl<S: Observable> Observable for SkipLastOp<S> {
  type Item = S::Item;

  async fn actual_subscribe(&self, observer: BoxObserver<S::Item>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let skip_last = SkipLastObserver {
      observer: safe,
      count: self.count,
      queue: Mutex::new(VecDeque::with_capacity(self.count + 1)),
    };
    let upstream = self.source.actual_subscribe(Arc::new(skip_last)).await;
    detach.attach(upstream)
  }
}

#[async_trait]
impl<Item: Send + 'static> Observer<Item> for SkipLastObserver<Item> {
  async fn next(&self, value: Item) {
    let ready = {
      let mut queue = self.queue.lock();
      queue.push_back(value);
      if queue.len() > self.count { queue.pop_front() } else { None }
    };
    if let Some(v) = ready {
      self.observer.next(v).await
    }
  }

  async fn error(&self, err: RxError) { self.observer.error(err).await }

  async fn complete(&self) {
    self.queue.lock().clear();
    self.observer.complete().await
  }
}
