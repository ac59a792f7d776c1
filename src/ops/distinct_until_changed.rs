use std::{ops::ControlFlow, sync::Arc};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
  auto_detach::auto_detach,
  mailbox::{Inbox, Mailbox},
  notification::Notification,
  observable::Observable,
  observer::{BoxObserver, NotificationObserver, Observer},
  subscription::BoxSubscription,
};

/// Only emits when the current value is different from the last.
///
/// Runs through an actor whose state is the last forwarded notification,
/// seeded with `Completed` so the first value always passes.
#[derive(Clone)]
pub struct DistinctUntilChangedOp<S> {
  source: S,
}

impl<S> DistinctUntilChangedOp<S> {
  pub(crate) fn new(source: S) -> Self { Self { source } }
}

#[async_trait]
impl<S> Observable for DistinctUntilChangedOp<S>
where
  S: Observable,
  S::Item: PartialEq + Clone,
{
  type Item = S::Item;

  async fn actual_subscribe(&self, observer: BoxObserver<S::Item>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let actor = move |inbox: Inbox<Notification<S::Item>>| async move {
      let sink = safe.clone();
      let result = inbox
        .run(Notification::<S::Item>::Completed, move |latest, n| {
          let sink = sink.clone();
          async move {
            let duplicate = n == latest;
            match n {
              Notification::Next(_) if duplicate => Ok(ControlFlow::Continue(latest)),
              Notification::Next(v) => {
                sink.next(v.clone()).await;
                Ok(ControlFlow::Continue(Notification::Next(v)))
              }
              Notification::Completed => {
                sink.complete().await;
                Ok(ControlFlow::Break(()))
              }
              Notification::Error(err) => Err(err),
            }
          }
        })
        .await;
      if let Err(err) = result {
        safe.error(err).await;
      }
    };
    let mailbox = Mailbox::start(CancellationToken::new(), actor);
    detach.add(mailbox.clone());
    let post = NotificationObserver::new(move |n| mailbox.post(n));
    let upstream = self.source.actual_subscribe(Arc::new(post)).await;
    detach.attach(upstream)
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[tokio::test]
  async fn drops_consecutive_duplicates() {
    let observer = TestObserver::new();
    observable::from_iter(vec![1, 1, 2, 2, 2, 3, 1])
      .distinct_until_changed()
      .subscribe(observer.clone())
      .await;
    observer.wait_terminal().await;
    assert_eq!(observer.values(), vec![1, 2, 3, 1]);
    assert!(observer.is_completed());
  }

  #[tokio::test]
  async fn idempotent() {
    let once = TestObserver::new();
    let twice = TestObserver::new();
    let source = observable::from_iter(vec!['a', 'a', 'b', 'a', 'a', 'c', 'c']);
    source.clone().distinct_until_changed().subscribe(once.clone()).await;
    source
      .distinct_until_changed()
      .distinct_until_changed()
      .subscribe(twice.clone())
      .await;
    once.wait_terminal().await;
    twice.wait_terminal().await;
    assert_eq!(once.values(), vec!['a', 'b', 'a', 'c']);
    assert_eq!(once.values(), twice.values());
  }

  #[tokio::test(start_paused = true)]
  async fn errors_are_forwarded() {
    let observer = TestObserver::new();
    let subject = Subject::new();
    subject.clone().distinct_until_changed().subscribe(observer.clone()).await;
    subject.next(1).await;
    subject.next(1).await;
    subject.error(RxError::msg("boom")).await;
    subject.next(2).await;
    observer.wait_terminal().await;
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert_eq!(observer.values(), vec![1]);
    assert_eq!(observer.received_error().map(|e| e.to_string()).as_deref(), Some("boom"));
    assert_eq!(observer.terminal_count(), 1);
    assert_eq!(subject.observer_count(), 0);
  }
}
