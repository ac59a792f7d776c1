use std::{marker::PhantomData, sync::Arc};

use async_trait::async_trait;

use crate::{
  auto_detach::{auto_detach, SafeObserver},
  error::RxError,
  observable::Observable,
  observer::{BoxObserver, Observer},
  subscription::BoxSubscription,
};

/// Creates a new stream which calls a closure on each element and uses its
/// return as the value.
pub struct MapOp<S, F> {
  source: S,
  func: Arc<F>,
}

impl<S, F> MapOp<S, F> {
  pub(crate) fn new(source: S, func: F) -> Self { Self { source, func: Arc::new(func) } }
}

struct MapObserver<In, Out, F> {
  observer: SafeObserver<Out>,
  func: Arc<F>,
  _input: PhantomData<fn(In)>,
}

#[async_trait]
impl<S, F, Out> Observable for MapOp<S, F>
where
  S: Observable,
  F: Fn(S::Item) -> Out + Send + Sync + 'static,
  Out: Send + 'static,
{
  type Item = Out;

  async fn actual_subscribe(&self, observer: BoxObserver<Out>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let map = MapObserver::<S::Item, Out, F> {
      observer: safe,
      func: self.func.clone(),
      _input: PhantomData,
    };
    let upstream = self.source.actual_subscribe(Arc::new(map)).await;
    detach.attach(upstream)
  }
}

#[async_trait]
impl<In, Out, F> Observer<In> for MapObserver<In, Out, F>
where
  In: Send + 'static,
  Out: Send + 'static,
  F: Fn(In) -> Out + Send + Sync + 'static,
{
  async fn next(&self, value: In) {
    let mapped = (self.func)(value);
    self.observer.next(mapped).await
  }

  async fn error(&self, err: RxError) { self.observer.error(err).await }

  async fn complete(&self) { self.observer.complete().await }
}
