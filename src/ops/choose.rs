//! `choose`: map and filter in one step.
//!
//! The chooser returns `Some(out)` to emit `out` or `None` to drop the
//! value. `choose_async` awaits the chooser before accepting the next value
//! and turns a failed chooser into a terminal error.

use std::{future::Future, marker::PhantomData, sync::Arc};

use async_trait::async_trait;

use crate::{
  auto_detach::{auto_detach, SafeObserver},
  error::RxError,
  observable::Observable,
  observer::{BoxObserver, Observer},
  subscription::BoxSubscription,
};

pub struct ChooseOp<S, F> {
  source: S,
  chooser: Arc<F>,
}

impl<S, F> ChooseOp<S, F> {
  pub(crate) fn new(source: S, chooser: F) -> Self { Self { source, chooser: Arc::new(chooser) } }
}

struct ChooseObserver<In, Out, F> {
  observer: SafeObserver<Out>,
  chooser: Arc<F>,
  _input: PhantomData<fn(In)>,
}

#[async_trait]
impl<S, F, Out> Observable for ChooseOp<S, F>
where
  S: Observable,
  F: Fn(S::Item) -> Option<Out> + Send + Sync + 'static,
  Out: Send + 'static,
{
  type Item = Out;

  async fn actual_subscribe(&self, observer: BoxObserver<Out>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let choose = ChooseObserver::<S::Item, Out, F> {
      observer: safe,
      chooser: self.chooser.clone(),
      _input: PhantomData,
    };
    let upstream = self.source.actual_subscribe(Arc::new(choose)).await;
    detach.attach(upstream)
  }
}

#[async_trait]
impl<In, Out, F> Observer<In> for ChooseObserver<In, Out, F>
where
  In: Send + 'static,
  Out: Send + 'static,
  F: Fn(In) -> Option<Out> + Send + Sync + 'static,
{
  async fn next(&self, value: In) {
    let chosen = (self.chooser)(value);
    if let Some(v) = chosen {
      self.observer.next(v).await
    }
  }

  async fn error(&self, err: RxError) { self.observer.error(err).await }

  async fn complete(&self) { self.observer.complete().await }
}

pub struct ChooseAsyncOp<S, F> {
  source: S,
  chooser: Arc<F>,
}

impl<S, F> ChooseAsyncOp<S, F> {
  pub(crate) fn new(source: S, chooser: F) -> Self { Self { source, chooser: Arc::new(chooser) } }
}

struct ChooseAsyncObserver<In, Out, F> {
  observer: SafeObserver<Out>,
  chooser: Arc<F>,
  _input: PhantomData<fn(In)>,
}

#[async_trait]
impl<S, F, Fut, Out> Observable for ChooseAsyncOp<S, F>
where
  S: Observable,
  F: Fn(S::Item) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<Option<Out>, RxError>> + Send + 'static,
  Out: Send + 'static,
{
  type Item = Out;

  async fn actual_subscribe(&self, observer: BoxObserver<Out>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let choose = ChooseAsyncObserver::<S::Item, Out, F> {
      observer: safe,
      chooser: self.chooser.clone(),
      _input: PhantomData,
    };
    let upstream = self.source.actual_subscribe(Arc::new(choose)).await;
    detach.attach(upstream)
  }
}

#[async_trait]
impl<In, Out, F, Fut> Observer<In> for ChooseAsyncObserver<In, Out, F>
where
  In: Send + 'static,
  Out: Send + 'static,
  F: Fn(In) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<Option<Out>, RxError>> + Send + 'static,
{
  async fn next(&self, value: In) {
    let chosen = (self.chooser)(value);
    match chosen.await {
      Ok(Some(v)) => self.observer.next(v).await,
      Ok(None) => {}
      Err(err) => self.observer.error(err).await,
    }
  }

  async fn error(&self, err: RxError) { self.observer.error(err).await }

  async fn complete(&self) { self.observer.complete().await }
}
