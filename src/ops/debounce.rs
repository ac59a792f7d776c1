//! Debounce operator implementation
//!
//! Every value is tagged with an increasing index and posted to an actor.
//! At the same time a timer re-posts that index after the quiet period. The
//! actor emits the pending value only when the re-posted index is still the
//! latest one, so a value survives only if nothing newer arrived within
//! `duration`.

use std::{
  ops::ControlFlow,
  sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
  },
};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
  auto_detach::auto_detach,
  mailbox::{Inbox, Mailbox},
  notification::Notification,
  observable::Observable,
  observer::{BoxObserver, NotificationObserver, Observer},
  scheduler::{spawn_cancellable, Duration},
  subscription::BoxSubscription,
};

#[derive(Clone)]
pub struct DebounceOp<S> {
  source: S,
  duration: Duration,
}

impl<S> DebounceOp<S> {
  pub(crate) fn new(source: S, duration: Duration) -> Self { Self { source, duration } }
}

enum DebounceMsg<Item> {
  Arrived(Notification<Item>, u64),
  Elapsed(u64),
}

/// The latest index seen and the value waiting for its quiet period.
struct Pending<Item> {
  latest: u64,
  value: Option<Item>,
}

#[async_trait]
impl<S: Observable> Observable for DebounceOp<S> {
  type Item = S::Item;

  async fn actual_subscribe(&self, observer: BoxObserver<S::Item>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let token = CancellationToken::new();
    let actor = move |inbox: Inbox<DebounceMsg<S::Item>>| async move {
      let sink = safe.clone();
      let initial = Pending { latest: 0, value: None };
      let result = inbox
        .run(initial, move |mut pending, msg| {
          let sink = sink.clone();
          async move {
            match msg {
              DebounceMsg::Arrived(Notification::Next(v), index) => {
                pending.latest = index;
                pending.value = Some(v);
              }
              DebounceMsg::Arrived(Notification::Error(err), _) => return Err(err),
              DebounceMsg::Arrived(Notification::Completed, _) => {
                if let Some(v) = pending.value.take() {
                  sink.next(v).await;
                }
                sink.complete().await;
                return Ok(ControlFlow::Break(()));
              }
              DebounceMsg::Elapsed(index) if index == pending.latest => {
                if let Some(v) = pending.value.take() {
                  sink.next(v).await;
                }
              }
              DebounceMsg::Elapsed(_) => tracing::trace!("debounce: superseded value dropped"),
            }
            Ok(ControlFlow::Continue(pending))
          }
        })
        .await;
      if let Err(err) = result {
        safe.error(err).await;
      }
    };
    let mailbox = Mailbox::start(token.clone(), actor);
    detach.add(mailbox.clone());
    let duration = self.duration;
    let counter = AtomicU64::new(0);
    let arrivals = NotificationObserver::new(move |n: Notification<S::Item>| {
      let index = counter.fetch_add(1, Ordering::Relaxed) + 1;
      let is_value = matches!(n, Notification::Next(_));
      mailbox.post(DebounceMsg::Arrived(n, index));
      if is_value {
        let timer = mailbox.clone();
        spawn_cancellable(token.child_token(), async move {
          tokio::time::sleep(duration).await;
          timer.post(DebounceMsg::Elapsed(index));
        });
      }
    });
    let upstream = self.source.actual_subscribe(Arc::new(arrivals)).await;
    detach.attach(upstream)
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[tokio::test(start_paused = true)]
  async fn emits_after_quiet_period() {
    let observer = TestObserver::new();
    let origin = Instant::now();
    let source = observable::create(|o: BoxObserver<u64>| async move {
      tokio::spawn(async move {
        o.next(0).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        o.next(10).await;
        tokio::time::sleep(Duration::from_millis(240)).await;
        o.next(250).await;
        tokio::time::sleep(Duration::from_millis(1000)).await;
        o.complete().await;
      });
      Box::new(ClosedSubscription) as BoxSubscription
    });
    source.debounce(Duration::from_millis(200)).subscribe(observer.clone()).await;
    observer.wait_terminal().await;

    assert_eq!(
      observer.timed_values(origin),
      vec![(Duration::from_millis(210), 10), (Duration::from_millis(450), 250)]
    );
    assert!(observer.is_completed());
  }

  #[tokio::test(start_paused = true)]
  async fn completion_flushes_pending_value() {
    let observer = TestObserver::new();
    let origin = Instant::now();
    observable::from_iter(vec![1, 2, 3])
      .debounce(Duration::from_millis(100))
      .subscribe(observer.clone())
      .await;
    observer.wait_terminal().await;

    assert_eq!(observer.timed_values(origin), vec![(Duration::ZERO, 3)]);
    assert!(observer.is_completed());
  }

  #[tokio::test(start_paused = true)]
  async fn error_discards_pending_value() {
    let subject = Subject::new();
    let observer = TestObserver::new();
    subject.clone().debounce(Duration::from_millis(100)).subscribe(observer.clone()).await;

    subject.next(1).await;
    subject.error(RxError::msg("boom")).await;
    observer.wait_terminal().await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(observer.values().is_empty());
    assert_eq!(observer.terminal_count(), 1);
    assert_eq!(observer.received_error().map(|e| e.to_string()).as_deref(), Some("boom"));
    assert_eq!(subject.observer_count(), 0);
  }

  #[tokio::test(start_paused = true)]
  async fn dispose_is_silent() {
    let subject = Subject::new();
    let observer = TestObserver::new();
    let mut subscription =
      subject.clone().debounce(Duration::from_millis(100)).subscribe(observer.clone()).await;

    subject.next(1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    subscription.unsubscribe();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(observer.values().is_empty());
    assert!(!observer.is_terminated());
    assert_eq!(subject.observer_count(), 0);
  }
}
