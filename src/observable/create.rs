use std::{future::Future, marker::PhantomData};

use async_trait::async_trait;

use crate::{
  auto_detach::auto_detach,
  observable::Observable,
  observer::BoxObserver,
  subscription::BoxSubscription,
};

/// Creates an observable from a subscribe function.
///
/// `subscribe` is called once per subscription with the downstream observer
/// and returns the subscription that releases whatever it started. The
/// observer it receives already drops anything after the first terminal
/// signal, so a careless producer cannot break the stream contract.
///
/// ```
/// use rxasync::prelude::*;
///
/// let source = observable::create(|observer: BoxObserver<i32>| async move {
///   observer.next(1).await;
///   observer.next(2).await;
///   observer.complete().await;
///   Box::new(ClosedSubscription) as BoxSubscription
/// });
/// # let _ = source;
/// ```
pub fn create<F, Fut, Item>(subscribe: F) -> Create<F, Item>
where
  F: Fn(BoxObserver<Item>) -> Fut + Send + Sync,
  Fut: Future<Output = BoxSubscription> + Send + 'static,
  Item: Send + 'static,
{
  Create { subscribe, _marker: PhantomData }
}

#[derive(Clone)]
pub struct Create<F, Item> {
  subscribe: F,
  _marker: PhantomData<fn() -> Item>,
}

#[async_trait]
impl<F, Fut, Item> Observable for Create<F, Item>
where
  F: Fn(BoxObserver<Item>) -> Fut + Send + Sync,
  Fut: Future<Output = BoxSubscription> + Send + 'static,
  Item: Send + 'static,
{
  type Item = Item;

  async fn actual_subscribe(&self, observer: BoxObserver<Item>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let safe: BoxObserver<Item> = safe;
    let subscription = (self.subscribe)(safe).await;
    detach.attach(subscription)
  }
}
