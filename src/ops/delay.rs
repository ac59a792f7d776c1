//! Delay operator implementation
//!
//! Every signal is stamped with `now + delay` on arrival and posted to an
//! actor. The actor sleeps until each stamp before forwarding, so the spacing
//! between signals survives the shift. Disposing cancels the actor without
//! waiting out pending delays.

use std::{ops::ControlFlow, sync::Arc};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
  auto_detach::auto_detach,
  mailbox::{Inbox, Mailbox},
  notification::Notification,
  observable::Observable,
  observer::{BoxObserver, NotificationObserver, Observer},
  scheduler::{self, Duration, Instant},
  subscription::BoxSubscription,
};

#[derive(Clone)]
pub struct DelayOp<S> {
  source: S,
  delay: Duration,
}

impl<S> DelayOp<S> {
  pub(crate) fn new(source: S, delay: Duration) -> Self { Self { source, delay } }
}

type Stamped<Item> = (Notification<Item>, Instant);

#[async_trait]
impl<S: Observable> Observable for DelayOp<S> {
  type Item = S::Item;

  async fn actual_subscribe(&self, observer: BoxObserver<S::Item>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let token = CancellationToken::new();
    let c_token = token.clone();
    let mailbox = Mailbox::start(token, move |inbox: Inbox<Stamped<S::Item>>| async move {
      let sink = safe.clone();
      let result = inbox
        .run((), move |(), (n, due)| {
          let sink = sink.clone();
          let token = c_token.clone();
          async move {
            if !scheduler::sleep_until(due, &token).await {
              tracing::debug!("delay: disposed with signals pending");
              return Ok(ControlFlow::Break(()));
            }
            match n {
              Notification::Next(v) => {
                sink.next(v).await;
                Ok(ControlFlow::Continue(()))
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
    });

    detach.add(mailbox.clone());
    let delay = self.delay;
    let stamp = NotificationObserver::new(move |n| mailbox.post((n, Instant::now() + delay)));
    let upstream = self.source.actual_subscribe(Arc::new(stamp)).await;
    detach.attach(upstream)
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[tokio::test(start_paused = true)]
  async fn shifts_every_value() {
    let observer = TestObserver::new();
    let origin = Instant::now();
    observable::from_iter(0..3)
      .delay(Duration::from_millis(50))
      .subscribe(observer.clone())
      .await;
    observer.wait_terminal().await;

    let timed = observer.timed_values(origin);
    assert_eq!(timed.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec![0, 1, 2]);
    for (at, _) in timed {
      assert!(at >= Duration::from_millis(50) && at < Duration::from_millis(52));
    }
    assert!(observer.is_completed());
  }

  #[tokio::test(start_paused = true)]
  async fn preserves_spacing() {
    let observer = TestObserver::new();
    let origin = Instant::now();
    observable::interval(Duration::from_millis(100))
      .unwrap()
      .take(3)
      .delay(Duration::from_millis(30))
      .subscribe(observer.clone())
      .await;
    observer.wait_terminal().await;

    let at: Vec<_> = observer.timed_values(origin).into_iter().map(|(at, _)| at).collect();
    assert_eq!(
      at,
      vec![Duration::from_millis(130), Duration::from_millis(230), Duration::from_millis(330)]
    );
  }

  #[tokio::test(start_paused = true)]
  async fn errors_are_delayed_too() {
    let observer = TestObserver::<i32>::new();
    let origin = Instant::now();
    observable::throw_err(RxError::msg("late"))
      .delay(Duration::from_millis(40))
      .subscribe(observer.clone())
      .await;
    assert!(!observer.is_terminated());
    observer.wait_terminal().await;
    assert!(origin.elapsed() >= Duration::from_millis(40));
    assert_eq!(observer.received_error().map(|e| e.to_string()).as_deref(), Some("late"));
  }

  #[tokio::test(start_paused = true)]
  async fn dispose_drops_pending_signals() {
    let observer = TestObserver::new();
    let mut subscription = observable::from_iter(0..3)
      .delay(Duration::from_millis(100))
      .subscribe(observer.clone())
      .await;

    tokio::time::sleep(Duration::from_millis(10)).await;
    subscription.unsubscribe();
    subscription.unsubscribe();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(observer.values().is_empty());
    assert!(!observer.is_terminated());
    assert!(subscription.is_closed());
  }
}
