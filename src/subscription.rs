//! Subscriptions: the disposable handles returned by `subscribe`.
//!
//! Every handle is idempotent: unsubscribing twice has the same effect as
//! unsubscribing once, and never panics.

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::{
  fmt::{Debug, Formatter},
  sync::Arc,
};
use tokio_util::sync::CancellationToken;

/// Subscription returned from `Observable::subscribe` to allow
/// unsubscribing.
pub trait SubscriptionLike {
  /// Releases every resource the subscription owns: upstream subscriptions,
  /// actors, timers. Safe to call from any task and never blocks.
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

pub type BoxSubscription = Box<dyn SubscriptionLike + Send + Sync>;

impl Debug for BoxSubscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BoxSubscription")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

impl<T: ?Sized> SubscriptionLike for Box<T>
where
  T: SubscriptionLike,
{
  #[inline]
  fn unsubscribe(&mut self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

impl SubscriptionLike for CancellationToken {
  #[inline]
  fn unsubscribe(&mut self) { self.cancel() }

  #[inline]
  fn is_closed(&self) -> bool { self.is_cancelled() }
}

/// A composite subscription.
///
/// Unsubscribing it unsubscribes every member. A member added after the
/// composite was closed is unsubscribed immediately, which lets an operator
/// close its subscription before the upstream handle even exists.
#[derive(Clone, Default)]
pub struct SharedSubscription(Arc<Mutex<Inner>>);

type Teardown = SmallVec<[BoxSubscription; 2]>;

#[derive(Default)]
struct Inner {
  closed: bool,
  teardown: Teardown,
}

impl SharedSubscription {
  pub fn new() -> Self { Self::default() }

  /// Builds a composite from already existing subscriptions.
  pub fn composite<I>(subscriptions: I) -> Self
  where
    I: IntoIterator<Item = BoxSubscription>,
  {
    let composite = Self::default();
    for s in subscriptions {
      composite.add(s);
    }
    composite
  }

  pub fn add<S: SubscriptionLike + Send + Sync + 'static>(&self, subscription: S) {
    let mut subscription: BoxSubscription = Box::new(subscription);
    {
      let mut inner = self.0.lock();
      if !inner.closed {
        inner.teardown.retain(|s| !s.is_closed());
        inner.teardown.push(subscription);
        return;
      }
    }
    subscription.unsubscribe();
  }

  pub fn teardown_size(&self) -> usize { self.0.lock().teardown.len() }
}

impl SubscriptionLike for SharedSubscription {
  fn unsubscribe(&mut self) {
    // Members are released outside the lock, one of them may own a clone of
    // this composite.
    let teardown = {
      let mut inner = self.0.lock();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    for mut s in teardown {
      s.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.lock().closed }
}

impl Debug for SharedSubscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.lock();
    f.debug_struct("SharedSubscription")
      .field("closed", &inner.closed)
      .field("teardown_count", &inner.teardown.len())
      .finish()
  }
}

/// A subscription that runs a closure the first time it is unsubscribed.
pub struct FnSubscription<F>(Mutex<Option<F>>);

impl<F: FnOnce()> FnSubscription<F> {
  pub fn new(f: F) -> Self { Self(Mutex::new(Some(f))) }
}

impl<F: FnOnce()> SubscriptionLike for FnSubscription<F> {
  fn unsubscribe(&mut self) {
    if let Some(f) = self.0.get_mut().take() {
      f();
    }
  }

  fn is_closed(&self) -> bool { self.0.lock().is_none() }
}

/// A subscription that is closed from the start, for pipelines that never
/// needed upstream resources.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClosedSubscription;

impl SubscriptionLike for ClosedSubscription {
  fn unsubscribe(&mut self) {}

  fn is_closed(&self) -> bool { true }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionGuard<T> {
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(subscription) }
}

impl<T: SubscriptionLike> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
