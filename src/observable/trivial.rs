use std::marker::PhantomData;

use async_trait::async_trait;

use crate::{
  error::RxError,
  observable::Observable,
  observer::{BoxObserver, Observer},
  subscription::{BoxSubscription, ClosedSubscription},
};

/// Creates an observable that emits no items, just terminates with an error.
pub fn throw_err<Item>(err: RxError) -> ThrowErr<Item> { ThrowErr(err, PhantomData) }

pub struct ThrowErr<Item>(RxError, PhantomData<fn() -> Item>);

impl<Item> Clone for ThrowErr<Item> {
  fn clone(&self) -> Self { ThrowErr(self.0.clone(), PhantomData) }
}

#[async_trait]
impl<Item: Send + 'static> Observable for ThrowErr<Item> {
  type Item = Item;

  async fn actual_subscribe(&self, observer: BoxObserver<Item>) -> BoxSubscription {
    observer.error(self.0.clone()).await;
    Box::new(ClosedSubscription)
  }
}

/// Creates an observable that produces no values.
///
/// Completes immediately. Never emits an error.
pub fn empty<Item>() -> Empty<Item> { Empty(PhantomData) }

pub struct Empty<Item>(PhantomData<fn() -> Item>);

impl<Item> Clone for Empty<Item> {
  fn clone(&self) -> Self { Empty(PhantomData) }
}

#[async_trait]
impl<Item: Send + 'static> Observable for Empty<Item> {
  type Item = Item;

  async fn actual_subscribe(&self, observer: BoxObserver<Item>) -> BoxSubscription {
    observer.complete().await;
    Box::new(ClosedSubscription)
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;

  #[tokio::test]
  async fn throw() {
    let observer = TestObserver::<i32>::new();
    let subscription =
      observable::throw_err(RxError::msg("boom")).subscribe(observer.clone()).await;
    assert_eq!(observer.received_error().map(|e| e.to_string()).as_deref(), Some("boom"));
    assert!(observer.values().is_empty());
    assert!(subscription.is_closed());
  }

  #[tokio::test]
  async fn empty() {
    let observer = TestObserver::<i32>::new();
    observable::empty().subscribe(observer.clone()).await;
    assert!(observer.values().is_empty());
    assert!(observer.is_completed());
  }
}
