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

/// Mirrors the source until `notifier` emits its first value, then
/// completes. An error from either side is forwarded; completion of the
/// notifier alone changes nothing.
///
/// Both sides post into one actor, so a source value racing the notifier
/// is either delivered before the completion or dropped.
#[derive(Clone)]
pub struct TakeUntilOp<S, N> {
  source: S,
  notifier: N,
}

impl<S, N> TakeUntilOp<S, N> {
  pub(crate) fn new(source: S, notifier: N) -> Self { Self { source, notifier } }
}

#[async_trait]
impl<S, N> Observable for TakeUntilOp<S, N>
where
  S: Observable,
  N: Observable,
{
  type Item = S::Item;

  async fn actual_subscribe(&self, observer: BoxObserver<S::Item>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let mailbox = Mailbox::start(
      CancellationToken::new(),
      move |inbox: Inbox<Notification<S::Item>>| async move {
        let sink = safe.clone();
        let result = inbox
          .run((), move |(), n| {
            let sink = sink.clone();
            async move {
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
      },
    );
    detach.add(mailbox.clone());

    let stop = mailbox.clone();
    let notifier = NotificationObserver::new(move |n: Notification<N::Item>| match n {
      Notification::Next(_) => stop.post(Notification::Completed),
      Notification::Error(err) => stop.post(Notification::Error(err)),
      Notification::Completed => {}
    });
    detach.add(self.notifier.actual_subscribe(Arc::new(notifier)).await);

    let forward = NotificationObserver::new(move |n: Notification<S::Item>| mailbox.post(n));
    let upstream = self.source.actual_subscribe(Arc::new(forward)).await;
    detach.attach(upstream)
  }
}
