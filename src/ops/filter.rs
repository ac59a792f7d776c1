use std::{future::Future, sync::Arc};

use async_trait::async_trait;

use crate::{
  auto_detach::{auto_detach, SafeObserver},
  error::RxError,
  observable::Observable,
  observer::{BoxObserver, Observer},
  subscription::BoxSubscription,
};

/// Emits only those values that pass a predicate.
///
/// ```
/// use rxasync::prelude::*;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let observer = TestObserver::new();
/// observable::from_iter(0..10)
///   .filter(|v| *v % 2 == 0)
///   .subscribe(observer.clone())
///   .await;
/// observer.wait_terminal().await;
/// assert_eq!(observer.values(), vec![0, 2, 4, 6, 8]);
/// # }
/// ```
pub struct FilterOp<S, F> {
  source: S,
  predicate: Arc<F>,
}

impl<S, F> FilterOp<S, F> {
  pub(crate) fn new(source: S, predicate: F) -> Self {
    Self { source, predicate: Arc::new(predicate) }
  }
}

struct FilterObserver<Item, F> {
  observer: SafeObserver<Item>,
  predicate: Arc<F>,
}

#[async_trait]
impl<S, F> Observable for FilterOp<S, F>
where
  S: Observable,
  F: Fn(&S::Item) -> bool + Send + Sync + 'static,
{
  type Item = S::Item;

  async fn actual_subscribe(&self, observer: BoxObserver<S::Item>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let filter = FilterObserver { observer: safe, predicate: self.predicate.clone() };
    let upstream = self.source.actual_subscribe(Arc::new(filter)).await;
    detach.attach(upstream)
  }
}

#[async_trait]
impl<Item, F> Observer<Item> for FilterObserver<Item, F>
where
  Item: Send + 'static,
  F: Fn(&Item) -> bool + Send + Sync + 'static,
{
  async fn next(&self, value: Item) {
    if (self.predicate)(&value) {
      self.observer.next(value).await
    }
  }

  async fn error(&self, err: RxError) { self.observer.error(err).await }

  async fn complete(&self) { self.observer.complete().await }
}

/// Asynchronous flavor of [`FilterOp`].
///
/// The predicate future runs to completion before the next value is
/// accepted. A failed predicate terminates the stream with its error.
pub struct FilterAsyncOp<S, F> {
  source: S,
  predicate: Arc<F>,
}

impl<S, F> FilterAsyncOp<S, F> {
  pub(crate) fn new(source: S, predicate: F) -> Self {
    Self { source, predicate: Arc::new(predicate) }
  }
}

struct FilterAsyncObserver<Item, F> {
  observer: SafeObserver<Item>,
  predicate: Arc<F>,
}

#[async_trait]
impl<S, F, Fut> Observable for FilterAsyncOp<S, F>
where
  S: Observable,
  F: Fn(&S::Item) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<bool, RxError>> + Send + 'static,
{
  type Item = S::Item;

  async fn actual_subscribe(&self, observer: BoxObserver<S::Item>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let filter = FilterAsyncObserver { observer: safe, predicate: self.predicate.clone() };
    let upstream = self.source.actual_subscribe(Arc::new(filter)).await;
    detach.attach(upstream)
  }
}

#[async_trait]
impl<Item, F, Fut> Observer<Item> for FilterAsyncObserver<Item, F>
where
  Item: Send + 'static,
  F: Fn(&Item) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<bool, RxError>> + Send + 'static,
{
  async fn next(&self, value: Item) {
    let verdict = (self.predicate)(&value);
    match verdict.await {
      Ok(true) => self.observer.next(value).await,
      Ok(false) => {}
      Err(err) => self.observer.error(err).await,
    }
  }

  async fn error(&self, err: RxError) { self.observer.error(err).await }

  async fn complete(&self) { self.observer.complete().await }
}

/// Filters a stream of pairs, handing both halves to the predicate.
pub struct StarFilterOp<S, F> {
  source: S,
  predicate: Arc<F>,
}

impl<S, F> StarFilterOp<S, F> {
  pub(crate) fn new(source: S, predicate: F) -> Self {
    Self { source, predicate: Arc::new(predicate) }
  }
}

struct StarFilterObserver<A, B, F> {
  observer: SafeObserver<(A, B)>,
  predicate: Arc<F>,
}

#[async_trait]
impl<S, A, B, F> Observable for StarFilterOp<S, F>
where
  S: Observable<Item = (A, B)>,
  A: Send + 'static,
  B: Send + 'static,
  F: Fn(&A, &B) -> bool + Send + Sync + 'static,
{
  type Item = (A, B);

  async fn actual_subscribe(&self, observer: BoxObserver<(A, B)>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let filter = StarFilterObserver { observer: safe, predicate: self.predicate.clone() };
    let upstream = self.source.actual_subscribe(Arc::new(filter)).await;
    detach.attach(upstream)
  }
}

#[async_trait]
impl<A, B, F> Observer<(A, B)> for StarFilterObserver<A, B, F>
where
  A: Send + 'static,
  B: Send + 'static,
  F: Fn(&A, &B) -> bool + Send + Sync + 'static,
{
  async fn next(&self, value: (A, B)) {
    if (self.predicate)(&value.0, &value.1) {
      self.observer.next(value).await
    }
  }

  async fn error(&self, err: RxError) { self.observer.error(err).await }

  async fn complete(&self) { self.observer.complete().await }
}
