use std::sync::Arc;

use async_trait::async_trait;

use crate::{
  observable::{interval, Observable, ObservableExt},
  observer::BoxObserver,
  ops::with_latest_from::WithLatestFromOp,
  scheduler::Duration,
  subscription::BoxSubscription,
};

/// Emits the most recent source value on every tick of a `period` timer.
///
/// Ticks before the first source value emit nothing; a tick repeats the
/// latest value if the source stayed silent. Completes when the source
/// completes. A zero `period` mirrors the source.
pub struct SampleOp<S> {
  source: Arc<S>,
  period: Duration,
}

impl<S> SampleOp<S> {
  pub(crate) fn new(source: S, period: Duration) -> Self {
    Self { source: Arc::new(source), period }
  }
}

impl<S> Clone for SampleOp<S> {
  fn clone(&self) -> Self { Self { source: self.source.clone(), period: self.period } }
}

fn latest<T, V>((_, v): (T, V)) -> V { v }

#[async_trait]
impl<S> Observable for SampleOp<S>
where
  S: Observable,
  S::Item: Clone,
{
  type Item = S::Item;

  async fn actual_subscribe(&self, observer: BoxObserver<S::Item>) -> BoxSubscription {
    let Ok(ticks) = interval(self.period) else {
      return self.source.actual_subscribe(observer).await;
    };
    WithLatestFromOp::completing_with_other(ticks, self.source.clone())
      .map(latest::<u64, S::Item>)
      .actual_subscribe(observer)
      .await
  }
}
