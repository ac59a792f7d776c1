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

/// Emits only the last `count` values, all at once when the source
/// completes. An error discards what was buffered.
#[derive(Clone)]
pub struct TakeLastOp<S> {
  source: S,
  count: usize,
}

impl<S> TakeLastOp<S> {
  pub(crate) fn new(source: S, count: usize) -> Self { Self { source, count } }
}

struct TakeLastObserver<Item> {
  observer: SafeObserver<Item>,
  count: usize,
  queue: Mutex<VecDeque<Item>>,
}

#[async_trait]
impl<S: Observable> Observable for TakeLastOp<S> {
  type Item = S::Item;

  async fn actual_subscribe(&self, observer: BoxObserver<S::Item>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let take_last = TakeLastObserver {
      observer: safe,
      count: self.count,
      queue: Mutex::new(VecDeque::with_capacity(self.count)),
    };
    let upstream = self.source.actual_subscribe(Arc::new(take_last)).await;
    detach.attach(upstream)
  }
}

#[async_trait]
impl<Item: Send + 'static> Observer<Item> for TakeLastObserver<Item> {
  async fn next(&self, value: Item) {
    if self.count == 0 {
      return;
    }
    let mut queue = self.queue.lock();
    if queue.len() == self.count {
      queue.pop_front();
    }
    queue.push_back(value);
  }

  async fn error(&self, err: RxError) {
    self.queue.lock().clear();
    self.observer.error(err).await
  }

  async fn complete(&self) {
    let last = std::mem::take(&mut *self.queue.lock());
    for v in last {
      self.observer.next(v).await;
    }
    self.observer.complete().await
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;

  #[tokio::test]
  async fn base_function() {
    let observer = TestObserver::new();
    observable::from_iter(vec![1, 2, 3, 4]).take_last(2).subscribe(observer.clone()).await;
    observer.wait_terminal().await;
    assert_eq!(observer.values(), vec![3, 4]);
    assert!(observer.is_completed());
  }

  #[tokio::test]
  async fn nothing_before_completion() {
    let subject = Subject::new();
    let observer = TestObserver::new();
    subject.clone().take_last(3).subscribe(observer.clone()).await;

    for v in 0..10 {
      subject.next(v).await;
    }
    assert!(observer.values().is_empty());
    subject.complete().await;
    assert_eq!(observer.values(), vec![7, 8, 9]);
  }

  #[tokio::test]
  async fn error_drops_the_buffer() {
    let subject = Subject::new();
    let observer = TestObserver::new();
    subject.clone().take_last(3).subscribe(observer.clone()).await;
    subject.next(1).await;
    subject.error(RxError::msg("boom")).await;

    assert!(observer.values().is_empty());
    assert!(observer.received_error().is_some());
  }
}
