use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
  auto_detach::{auto_detach, SafeObserver},
  error::RxError,
  observable::Observable,
  observer::{BoxObserver, Observer},
  subscription::{BoxSubscription, ClosedSubscription},
};

/// Pairs each value with the next item of a plain sequence.
pub struct ZipSeqOp<S, I> {
  source: S,
  seq: I,
}

impl<S, I> ZipSeqOp<S, I> {
  pub(crate) fn new(source: S, seq: I) -> Self { Self { source, seq } }
}

struct ZipSeqObserver<Item, It: Iterator> {
  observer: SafeObserver<(Item, It::Item)>,
  seq: Mutex<It>,
}

#[async_trait]
impl<S, I> Observable for ZipSeqOp<S, I>
where
  S: Observable,
  I: IntoIterator + Clone + Send + Sync + 'static,
  I::IntoIter: Send + 'static,
  I::Item: Send + 'static,
{
  type Item = (S::Item, I::Item);

  async fn actual_subscribe(&self, observer: BoxObserver<Self::Item>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let mut seq = self.seq.clone().into_iter().peekable();
    if seq.peek().is_none() {
      safe.complete().await;
      return detach.attach(ClosedSubscription);
    }
    let zip = ZipSeqObserver { observer: safe, seq: Mutex::new(seq) };
    let upstream = self.source.actual_subscribe(Arc::new(zip)).await;
    detach.attach(upstream)
  }
}

#[async_trait]
impl<Item, It> Observer<Item> for ZipSeqObserver<Item, It>
where
  Item: Send + 'static,
  It: Iterator + Send + 'static,
  It::Item: Send + 'static,
{
  async fn next(&self, value: Item) {
    let (paired, exhausted) = {
      let mut seq = self.seq.lock();
      let paired = seq.next();
      let exhausted = paired.is_some() && seq.size_hint().1 == Some(0);
      (paired, exhausted)
    };
    match paired {
      Some(other) => {
        self.observer.next((value, other)).await;
        if exhausted {
          self.observer.complete().await;
        }
      }
      None => self.observer.complete().await,
    }
  }

  async fn error(&self, err: RxError) { self.observer.error(err).await }

  async fn complete(&self) { self.observer.complete().await }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[tokio::test]
  async fn pairs_with_an_index() {
    let observer = TestObserver::new();
    observable::from_iter(vec!['a', 'b', 'c'])
      .zip_seq(0..)
      .subscribe(observer.clone())
      .await;
    observer.wait_terminal().await;
    assert_eq!(observer.values(), vec![('a', 0), ('b', 1), ('c', 2)]);
    assert!(observer.is_completed());
  }

  #[tokio::test]
  async fn completes_when_the_sequence_runs_out() {
    let observer = TestObserver::new();
    observable::from_iter(0..100)
      .zip_seq(vec!["x", "y"])
      .subscribe(observer.clone())
      .await;
    observer.wait_terminal().await;
    assert_eq!(observer.values(), vec![(0, "x"), (1, "y")]);
    assert_eq!(observer.terminal_count(), 1);
  }

  #[tokio::test]
  async fn every_subscription_restarts_the_sequence() {
    let source = observable::from_iter(vec![5, 6]).zip_seq(1..).boxed();
    for _ in 0..2 {
      let observer = TestObserver::new();
      source.subscribe(observer.clone()).await;
      observer.wait_terminal().await;
      assert_eq!(observer.values(), vec![(5, 1), (6, 2)]);
    }
  }
}
