use async_trait::async_trait;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{
  auto_detach::auto_detach,
  error::ConfigError,
  observable::Observable,
  observer::{BoxObserver, Observer},
  scheduler::{spawn_cancellable, Duration, Instant},
  subscription::BoxSubscription,
};

/// Creates an observable which fires `0, 1, 2, ...` every `period`, the
/// first tick one `period` after subscribing. Never completes on its own.
///
/// A zero `period` is rejected with [`ConfigError::ZeroPeriod`].
pub fn interval(period: Duration) -> Result<Interval, ConfigError> {
  if period.is_zero() {
    return Err(ConfigError::ZeroPeriod);
  }
  Ok(Interval { period })
}

#[derive(Clone, Copy, Debug)]
pub struct Interval {
  period: Duration,
}

#[async_trait]
impl Observable for Interval {
  type Item = u64;

  async fn actual_subscribe(&self, observer: BoxObserver<u64>) -> BoxSubscription {
    let (safe, detach) = auto_detach(observer);
    let token = CancellationToken::new();
    let period = self.period;
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    spawn_cancellable(token.clone(), async move {
      let mut seq = 0;
      loop {
        ticker.tick().await;
        if safe.is_stopped() {
          return;
        }
        safe.next(seq).await;
        seq += 1;
      }
    });
    detach.attach(token)
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[tokio::test(start_paused = true)]
  async fn ticks_every_period() {
    let observer = TestObserver::new();
    let origin = Instant::now();
    let mut subscription = observable::interval(Duration::from_millis(100))
      .unwrap()
      .subscribe(observer.clone())
      .await;

    tokio::time::sleep(Duration::from_millis(350)).await;
    subscription.unsubscribe();
    tokio::time::sleep(Duration::from_millis(500)).await;

    let ticks = observer.timed_values(origin);
    assert_eq!(ticks.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(ticks[0].0, Duration::from_millis(100));
    assert_eq!(ticks[2].0, Duration::from_millis(300));
    assert!(!observer.is_terminated());
  }

  #[test]
  fn zero_period_is_rejected() {
    assert_eq!(observable::interval(Duration::ZERO).err(), Some(ConfigError::ZeroPeriod));
    assert!(observable::interval(Duration::from_nanos(1)).is_ok());
  }
}
