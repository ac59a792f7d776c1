//! Auto-detach: terminal-once delivery plus self-unsubscription.
//!
//! Every operator routes its downstream observer through [`auto_detach`]
//! before subscribing upstream. The returned [`AutoDetachObserver`] forwards
//! values until the first terminal signal, forwards that signal exactly once
//! and then unsubscribes the whole subscription, so upstream resources are
//! released as soon as the stream ends rather than when the consumer gets
//! around to unsubscribing.

use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use async_trait::async_trait;

use crate::{
  error::RxError,
  observer::{BoxObserver, Observer},
  subscription::{BoxSubscription, SharedSubscription, SubscriptionLike},
};

pub struct AutoDetachObserver<Item> {
  observer: BoxObserver<Item>,
  stopped: AtomicBool,
  subscription: SharedSubscription,
}

/// The subscription half of [`auto_detach`].
///
/// Collects the operator-local resources and the upstream subscription into
/// the composite that the terminal signal tears down.
pub struct AutoDetach(SharedSubscription);

pub type SafeObserver<Item> = Arc<AutoDetachObserver<Item>>;

pub fn auto_detach<Item>(observer: BoxObserver<Item>) -> (SafeObserver<Item>, AutoDetach) {
  let subscription = SharedSubscription::default();
  let safe = AutoDetachObserver {
    observer,
    stopped: AtomicBool::new(false),
    subscription: subscription.clone(),
  };
  (Arc::new(safe), AutoDetach(subscription))
}

impl<Item> AutoDetachObserver<Item> {
  #[inline]
  pub fn is_stopped(&self) -> bool { self.stopped.load(Ordering::Acquire) }

  fn stop(&self) -> bool { !self.stopped.swap(true, Ordering::AcqRel) }

  fn detach(&self) {
    tracing::trace!("auto-detach: terminal signal delivered, unsubscribing");
    self.subscription.clone().unsubscribe();
  }
}

#[async_trait]
impl<Item: Send + 'static> Observer<Item> for AutoDetachObserver<Item> {
  async fn next(&self, value: Item) {
    if !self.is_stopped() {
      self.observer.next(value).await;
    }
  }

  async fn error(&self, err: RxError) {
    if self.stop() {
      self.observer.error(err).await;
      self.detach();
    }
  }

  async fn complete(&self) {
    if self.stop() {
      self.observer.complete().await;
      self.detach();
    }
  }
}

impl AutoDetach {
  /// Registers an operator-local resource (actor, timer, secondary source).
  pub fn add<S: SubscriptionLike + Send + Sync + 'static>(&self, subscription: S) {
    self.0.add(subscription)
  }

  /// Registers the upstream subscription and hands out the composite.
  ///
  /// If the stream already terminated while subscribing, `upstream` is
  /// unsubscribed right here.
  pub fn attach<S: SubscriptionLike + Send + Sync + 'static>(self, upstream: S) -> BoxSubscription {
    self.0.add(upstream);
    Box::new(self.0)
  }
}
