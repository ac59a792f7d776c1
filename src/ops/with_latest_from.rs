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

/// Combines each value of the source with the latest value of `other`.
///
/// Nothing is emitted until `other` has produced a value. The source's
/// completion completes the stream; an error from either side terminates it.
#[derive(Clone)]
pub struct WithLatestFromOp<S, O> {
  source: S,
  other: O,
  complete_with_other: bool,
}

impl<S, O> WithLatestFromOp<S, O> {
  pub(crate) fn new(source: S, other: O) -> Self {
    Self { source, other, complete_with_other: false }
  }

  /// Also completes when `other` completes.
  pub(crate) fn completing_with_other(source: S, other: O) -> Self {
    Self { source, other, complete_with_other: true }
  }
}

enum Side<Item, Other> {
  Primary(Notification<Item>),
  Secondary(Notification<Other>),
}

#[async_trait]
impl<S, O> Observable for WithLatestFromOp<S, O>
where
  S: Observable,
  O: Observable,
  O::Item: Clone,
{
  type Item = (S::Item, O::Item);

  async fn actual_subscribe(&self, observer: BoxObserver<Self::Item>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let complete_with_other = self.complete_with_other;
    let mailbox = Mailbox::start(
      CancellationToken::new(),
      move |inbox: Inbox<Side<S::Item, O::Item>>| async move {
        let sink = safe.clone();
        let result = inbox
          .run(None, move |latest: Option<O::Item>, msg| {
            let sink = sink.clone();
            async move {
              match msg {
                Side::Primary(Notification::Next(v)) => {
                  if let Some(other) = latest.clone() {
                    sink.next((v, other)).await;
                  }
                  Ok(ControlFlow::Continue(latest))
                }
                Side::Secondary(Notification::Next(other)) => {
                  Ok(ControlFlow::Continue(Some(other)))
                }
                Side::Secondary(Notification::Completed) if !complete_with_other => {
                  Ok(ControlFlow::Continue(latest))
                }
                Side::Primary(Notification::Completed)
                | Side::Secondary(Notification::Completed) => {
                  sink.complete().await;
                  Ok(ControlFlow::Break(()))
                }
                Side::Primary(Notification::Error(err))
                | Side::Secondary(Notification::Error(err)) => Err(err),
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

    let secondary = mailbox.clone();
    let secondary = NotificationObserver::new(move |n: Notification<O::Item>| {
      secondary.post(Side::Secondary(n))
    });
    detach.add(self.other.actual_subscribe(Arc::new(secondary)).await);

    let primary =
      NotificationObserver::new(move |n: Notification<S::Item>| mailbox.post(Side::Primary(n)));
    let upstream = self.source.actual_subscribe(Arc::new(primary)).await;
    detach.attach(upstream)
  }
}
