//! The Observable trait and its chaining extension.
//!
//! An [`Observable`] only knows how to attach one observer and hand back a
//! subscription. Everything else lives in [`ObservableExt`], which is
//! implemented for every observable and turns each operator into a chaining
//! method:
//!
//! ```
//! use rxasync::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let observer = TestObserver::new();
//! observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .skip(1)
//!   .take(3)
//!   .subscribe(observer.clone())
//!   .await;
//! observer.wait_terminal().await;
//! assert_eq!(observer.values(), vec![2, 4, 6]);
//! # }
//! ```

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::{
  error::{ConfigError, RxError},
  observer::{BoxObserver, Observer},
  ops::{
    choose::{ChooseAsyncOp, ChooseOp},
    debounce::DebounceOp,
    delay::DelayOp,
    distinct_until_changed::DistinctUntilChangedOp,
    filter::{FilterAsyncOp, FilterOp, StarFilterOp},
    map::MapOp,
    sample::SampleOp,
    skip::SkipOp,
    skip_last::SkipLastOp,
    slice,
    take::TakeOp,
    take_last::TakeLastOp,
    take_until::TakeUntilOp,
    with_latest_from::WithLatestFromOp,
    zip_seq::ZipSeqOp,
  },
  scheduler::Duration,
  subscription::BoxSubscription,
};

mod create;
mod from_iter;
mod interval;
mod trivial;

pub use create::{create, Create};
pub use from_iter::{from_iter, FromIter};
pub use interval::{interval, Interval};
pub use trivial::{empty, throw_err, Empty, ThrowErr};

/// A source of values that can be subscribed to any number of times.
///
/// Each call to `actual_subscribe` starts an independent subscription.
#[async_trait]
pub trait Observable: Send + Sync {
  type Item: Send + 'static;

  async fn actual_subscribe(&self, observer: BoxObserver<Self::Item>) -> BoxSubscription;
}

pub type BoxedObservable<Item> = Arc<dyn Observable<Item = Item>>;

#[async_trait]
impl<S> Observable for Arc<S>
where
  S: Observable + ?Sized,
{
  type Item = S::Item;

  #[inline]
  async fn actual_subscribe(&self, observer: BoxObserver<Self::Item>) -> BoxSubscription {
    (**self).actual_subscribe(observer).await
  }
}

pub trait ObservableExt: Observable + Sized {
  /// Subscribes `observer` and returns the subscription once the chain is
  /// attached.
  fn subscribe<O>(&self, observer: O) -> BoxFuture<'_, BoxSubscription>
  where
    O: Observer<Self::Item> + 'static,
  {
    self.actual_subscribe(Arc::new(observer))
  }

  /// Erases the concrete operator type.
  fn boxed(self) -> BoxedObservable<Self::Item>
  where
    Self: 'static,
  {
    Arc::new(self)
  }

  /// Applies a custom operator, keeping left-to-right chaining.
  fn pipe<R>(self, operator: impl FnOnce(Self) -> R) -> R { operator(self) }

  /// Emits only the values for which `predicate` holds.
  fn filter<F>(self, predicate: F) -> FilterOp<Self, F>
  where
    F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    FilterOp::new(self, predicate)
  }

  /// Like [`filter`](ObservableExt::filter) with an asynchronous predicate.
  /// A predicate failure terminates the stream with that error.
  fn filter_async<F, Fut>(self, predicate: F) -> FilterAsyncOp<Self, F>
  where
    F: Fn(&Self::Item) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool, RxError>> + Send + 'static,
  {
    FilterAsyncOp::new(self, predicate)
  }

  /// Filters pairs by handing both halves to `predicate`.
  fn starfilter<A, B, F>(self, predicate: F) -> StarFilterOp<Self, F>
  where
    Self: Observable<Item = (A, B)>,
    F: Fn(&A, &B) -> bool + Send + Sync + 'static,
  {
    StarFilterOp::new(self, predicate)
  }

  /// Filters with the arrival index of every value, starting at 0.
  fn filteri<F>(self, predicate: F) -> impl Observable<Item = Self::Item>
  where
    F: Fn(&Self::Item, usize) -> bool + Send + Sync + 'static,
  {
    self
      .zip_seq(0usize..)
      .starfilter(move |value: &Self::Item, index: &usize| predicate(value, *index))
      .map(|(value, _)| value)
  }

  /// Maps and filters in one pass: `None` drops the value.
  fn choose<F, Out>(self, chooser: F) -> ChooseOp<Self, F>
  where
    F: Fn(Self::Item) -> Option<Out> + Send + Sync + 'static,
    Out: Send + 'static,
  {
    ChooseOp::new(self, chooser)
  }

  fn choose_async<F, Fut, Out>(self, chooser: F) -> ChooseAsyncOp<Self, F>
  where
    F: Fn(Self::Item) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Out>, RxError>> + Send + 'static,
    Out: Send + 'static,
  {
    ChooseAsyncOp::new(self, chooser)
  }

  fn map<F, Out>(self, f: F) -> MapOp<Self, F>
  where
    F: Fn(Self::Item) -> Out + Send + Sync + 'static,
    Out: Send + 'static,
  {
    MapOp::new(self, f)
  }

  /// Pairs every value with the next item of `seq`. The sequence restarts
  /// for each subscription; the stream completes when it runs out.
  fn zip_seq<I>(self, seq: I) -> ZipSeqOp<Self, I>
  where
    I: IntoIterator + Clone + Send + Sync + 'static,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
  {
    ZipSeqOp::new(self, seq)
  }

  fn skip(self, count: usize) -> SkipOp<Self> { SkipOp::new(self, count) }

  /// Drops the last `count` values. Values are held back by `count`
  /// arrivals, and whatever is still held at completion is discarded.
  fn skip_last(self, count: usize) -> SkipLastOp<Self> { SkipLastOp::new(self, count) }

  /// Emits the first `count` values, then completes and releases the
  /// upstream.
  fn take(self, count: usize) -> TakeOp<Self> { TakeOp::new(self, count) }

  /// Emits the last `count` values when the source completes.
  fn take_last(self, count: usize) -> TakeLastOp<Self> { TakeLastOp::new(self, count) }

  /// Completes as soon as `notifier` emits its first value.
  fn take_until<N>(self, notifier: N) -> TakeUntilOp<Self, N>
  where
    N: Observable,
  {
    TakeUntilOp::new(self, notifier)
  }

  /// Python-style slicing built from `skip`, `take_last`, `take`,
  /// `skip_last` and `filteri`.
  ///
  /// ```text
  ///  r---e---a---c---t---i---v---e---|
  ///  0   1   2   3   4   5   6   7   8
  /// -8  -7  -6  -5  -4  -3  -2  -1
  /// ```
  fn slice(
    self,
    start: Option<isize>,
    stop: Option<isize>,
    step: isize,
  ) -> Result<BoxedObservable<Self::Item>, ConfigError>
  where
    Self: 'static,
  {
    slice::slice(self, start, stop, step)
  }

  /// Time shifts every signal by `delay`, preserving the spacing between
  /// them.
  fn delay(self, delay: Duration) -> DelayOp<Self> { DelayOp::new(self, delay) }

  /// Emits a value only after `duration` passed without another value.
  fn debounce(self, duration: Duration) -> DebounceOp<Self> { DebounceOp::new(self, duration) }

  /// Emits the latest value every `period`. A zero period leaves the
  /// source untouched.
  fn sample(self, period: Duration) -> SampleOp<Self>
  where
    Self::Item: Clone,
  {
    SampleOp::new(self, period)
  }

  /// Emits `(value, latest value of other)` for every value once `other`
  /// has produced something.
  fn with_latest_from<O>(self, other: O) -> WithLatestFromOp<Self, O>
  where
    O: Observable,
    O::Item: Clone,
  {
    WithLatestFromOp::new(self, other)
  }

  /// Suppresses consecutive duplicates.
  fn distinct_until_changed(self) -> DistinctUntilChangedOp<Self>
  where
    Self::Item: PartialEq + Clone,
  {
    DistinctUntilChangedOp::new(self)
  }
}

impl<S: Observable> ObservableExt for S {}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[tokio::test(start_paused = true)]
  async fn boxed_observable_is_reusable() {
    let source: BoxedObservable<i32> = observable::from_iter(vec![1, 2, 3]).map(|v| v * 10).boxed();

    for _ in 0..2 {
      let observer = TestObserver::new();
      source.subscribe(observer.clone()).await;
      observer.wait_terminal().await;
      assert_eq!(observer.values(), vec![10, 20, 30]);
    }
  }

  #[tokio::test(start_paused = true)]
  async fn pipe_applies_custom_operator() {
    fn evens<S: Observable<Item = i32>>(source: S) -> impl Observable<Item = i32> {
      source.filter(|v| v % 2 == 0)
    }

    let observer = TestObserver::new();
    observable::from_iter(1..=6).pipe(evens).subscribe(observer.clone()).await;
    observer.wait_terminal().await;
    assert_eq!(observer.values(), vec![2, 4, 6]);
  }
}
