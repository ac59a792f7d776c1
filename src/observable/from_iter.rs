use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
  auto_detach::auto_detach,
  observable::Observable,
  observer::{BoxObserver, Observer},
  scheduler::spawn_cancellable,
  subscription::BoxSubscription,
};

/// Creates an observable that produces values from an iterator.
///
/// Every subscription walks its own clone of `iter` on a spawned task,
/// awaiting the observer for each value, then completes. Unsubscribing stops
/// the walk before the next value.
///
/// ```
/// use rxasync::prelude::*;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let observer = TestObserver::new();
/// observable::from_iter(vec![0, 1, 2, 3]).subscribe(observer.clone()).await;
/// observer.wait_terminal().await;
/// assert_eq!(observer.values(), vec![0, 1, 2, 3]);
/// # }
/// ```
pub fn from_iter<I>(iter: I) -> FromIter<I>
where
  I: IntoIterator + Clone,
{
  FromIter(iter)
}

#[derive(Clone)]
pub struct FromIter<I>(I);

#[async_trait]
impl<I> Observable for FromIter<I>
where
  I: IntoIterator + Clone + Send + Sync + 'static,
  I::IntoIter: Send + 'static,
  I::Item: Send + 'static,
{
  type Item = I::Item;

  async fn actual_subscribe(&self, observer: BoxObserver<I::Item>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let token = CancellationToken::new();
    let c_token = token.clone();
    let iter = self.0.clone().into_iter();
    spawn_cancellable(token.clone(), async move {
      for v in iter {
        if c_token.is_cancelled() || safe.is_stopped() {
          return;
        }
        safe.next(v).await;
      }
      safe.complete().await;
    });
    detach.attach(token)
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[tokio::test]
  async fn emits_every_value_then_completes() {
    let observer = TestObserver::new();
    observable::from_iter(0..5).subscribe(observer.clone()).await;
    observer.wait_terminal().await;
    assert_eq!(observer.values(), vec![0, 1, 2, 3, 4]);
    assert!(observer.is_completed());
  }

  #[tokio::test]
  async fn empty_iterator_only_completes() {
    let observer = TestObserver::<i32>::new();
    observable::from_iter(Vec::new()).subscribe(observer.clone()).await;
    observer.wait_terminal().await;
    assert!(observer.values().is_empty());
    assert!(observer.is_completed());
  }

  #[tokio::test(start_paused = true)]
  async fn unsubscribe_stops_the_walk() {
    let observer = TestObserver::new();
    let slow = AnonymousObserver::new({
      let observer = observer.clone();
      move |v: u32| {
        let observer = observer.clone();
        async move {
          tokio::time::sleep(Duration::from_millis(10)).await;
          observer.next(v).await;
        }
      }
    });
    let mut subscription = observable::from_iter(0..100u32).subscribe(slow).await;

    tokio::time::sleep(Duration::from_millis(35)).await;
    subscription.unsubscribe();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(observer.values(), vec![0, 1, 2]);
    assert!(subscription.is_closed());
  }
}
