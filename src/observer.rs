//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion). All three are asynchronous: the
//! upstream awaits the observer before it pushes the next signal.

use std::future::Future;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;

use crate::{error::RxError, notification::Notification};

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of data in reactive programming
///
/// At most one of `error` and `complete` is ever delivered to an observer,
/// and `next` is never delivered after it. Operators uphold this by routing
/// every downstream observer through [`auto_detach`].
///
/// Observers are shared between the upstream, actors and timers of one
/// subscription, so every method takes `&self`.
///
/// [`auto_detach`]: crate::auto_detach::auto_detach
#[async_trait]
pub trait Observer<Item>: Send + Sync {
  /// Receive the next value from the observable
  async fn next(&self, value: Item);

  /// Handle an error from the observable. Terminal.
  async fn error(&self, err: RxError);

  /// Handle completion of the observable. Terminal.
  async fn complete(&self);
}

/// The type-erased observer handed from operator to operator.
pub type BoxObserver<Item> = Arc<dyn Observer<Item>>;

#[async_trait]
impl<Item, O> Observer<Item> for Arc<O>
where
  O: Observer<Item> + ?Sized,
  Item: Send + 'static,
{
  #[inline]
  async fn next(&self, value: Item) { (**self).next(value).await }

  #[inline]
  async fn error(&self, err: RxError) { (**self).error(err).await }

  #[inline]
  async fn complete(&self) { (**self).complete().await }
}

// ============================================================================
// AnonymousObserver - Closure adapter
// ============================================================================

type ErrorHandler = Box<dyn Fn(RxError) -> BoxFuture<'static, ()> + Send + Sync>;
type CompleteHandler = Box<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Builds an observer from up to three asynchronous callables.
///
/// Without an `on_error` handler errors are logged and dropped; without an
/// `on_complete` handler completion is ignored.
///
/// ```
/// # use rxasync::prelude::*;
/// let observer = AnonymousObserver::new(|v: i32| async move { println!("{v}") })
///   .on_complete(|| async { println!("done") });
/// # let _ = observer;
/// ```
pub struct AnonymousObserver<N> {
  next: N,
  error: Option<ErrorHandler>,
  complete: Option<CompleteHandler>,
}

impl<N> AnonymousObserver<N> {
  pub fn new(next: N) -> Self { Self { next, error: None, complete: None } }

  pub fn on_error<F, Fut>(mut self, f: F) -> Self
  where
    F: Fn(RxError) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
  {
    self.error = Some(Box::new(move |err| f(err).boxed()));
    self
  }

  pub fn on_complete<F, Fut>(mut self, f: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
  {
    self.complete = Some(Box::new(move || f().boxed()));
    self
  }
}

#[async_trait]
impl<Item, N, Fut> Observer<Item> for AnonymousObserver<N>
where
  N: Fn(Item) -> Fut + Send + Sync,
  Fut: Future<Output = ()> + Send,
  Item: Send + 'static,
{
  async fn next(&self, value: Item) { (self.next)(value).await }

  async fn error(&self, err: RxError) {
    match &self.error {
      Some(handler) => handler(err).await,
      None => tracing::warn!(error = %err, "unhandled error reached an observer"),
    }
  }

  async fn complete(&self) {
    if let Some(handler) = &self.complete {
      handler().await;
    }
  }
}

// ============================================================================
// NotificationObserver - funnels all signals into one callable
// ============================================================================

/// Wraps the three observer calls into [`Notification`] values and hands
/// them to a synchronous callable, typically a mailbox `post`.
pub struct NotificationObserver<F>(F);

impl<F> NotificationObserver<F> {
  pub fn new(f: F) -> Self { Self(f) }
}

#[async_trait]
impl<Item, F> Observer<Item> for NotificationObserver<F>
where
  F: Fn(Notification<Item>) + Send + Sync,
  Item: Send + 'static,
{
  async fn next(&self, value: Item) { (self.0)(Notification::Next(value)) }

  async fn error(&self, err: RxError) { (self.0)(Notification::Error(err)) }

  async fn complete(&self) { (self.0)(Notification::Completed) }
}

// ============================================================================
// Tests
// ============================================================================
