//! A recording observer for tests.
//!
//! [`TestObserver`] stores every signal with the instant it arrived, so
//! timing operators can be checked against a paused tokio clock:
//!
//! ```
//! use rxasync::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() {
//! let observer = TestObserver::new();
//! let origin = Instant::now();
//! observable::from_iter([1, 2])
//!   .delay(Duration::from_millis(50))
//!   .subscribe(observer.clone())
//!   .await;
//! observer.wait_terminal().await;
//! assert_eq!(observer.values(), vec![1, 2]);
//! assert!(observer.timed_values(origin)[0].0 >= Duration::from_millis(50));
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::{
  error::RxError,
  notification::Notification,
  observer::Observer,
  scheduler::{Duration, Instant},
};

/// Cheap to clone; all clones share one log.
pub struct TestObserver<Item> {
  inner: Arc<Inner<Item>>,
}

struct Inner<Item> {
  log: Mutex<Vec<(Instant, Notification<Item>)>>,
  terminated: Notify,
}

impl<Item> TestObserver<Item> {
  pub fn new() -> Self {
    Self {
      inner: Arc::new(Inner { log: Mutex::new(Vec::new()), terminated: Notify::new() }),
    }
  }

  pub fn terminal_count(&self) -> usize {
    self.inner.log.lock().iter().filter(|(_, n)| n.is_terminal()).count()
  }

  pub fn is_terminated(&self) -> bool { self.terminal_count() > 0 }

  pub fn is_completed(&self) -> bool {
    self
      .inner
      .log
      .lock()
      .iter()
      .any(|(_, n)| matches!(n, Notification::Completed))
  }

  pub fn received_error(&self) -> Option<RxError> {
    self.inner.log.lock().iter().find_map(|(_, n)| match n {
      Notification::Error(err) => Some(err.clone()),
      _ => None,
    })
  }

  /// Resolves once a terminal signal has been recorded.
  pub async fn wait_terminal(&self) {
    loop {
      let notified = self.inner.terminated.notified();
      if self.is_terminated() {
        return;
      }
      notified.await;
    }
  }
}

impl<Item: Clone> TestObserver<Item> {
  pub fn notifications(&self) -> Vec<Notification<Item>> {
    self.inner.log.lock().iter().map(|(_, n)| n.clone()).collect()
  }

  pub fn values(&self) -> Vec<Item> {
    self
      .inner
      .log
      .lock()
      .iter()
      .filter_map(|(_, n)| match n {
        Notification::Next(v) => Some(v.clone()),
        _ => None,
      })
      .collect()
  }

  /// Values paired with their arrival time relative to `origin`.
  pub fn timed_values(&self, origin: Instant) -> Vec<(Duration, Item)> {
    self
      .inner
      .log
      .lock()
      .iter()
      .filter_map(|(at, n)| match n {
        Notification::Next(v) => Some((at.duration_since(origin), v.clone())),
        _ => None,
      })
      .collect()
  }
}

impl<Item> Default for TestObserver<Item> {
  fn default() -> Self { Self::new() }
}

impl<Item> Clone for TestObserver<Item> {
  fn clone(&self) -> Self { Self { inner: self.inner.clone() } }
}

impl<Item> TestObserver<Item> {
  fn record(&self, n: Notification<Item>) {
    let terminal = n.is_terminal();
    self.inner.log.lock().push((Instant::now(), n));
    if terminal {
      self.inner.terminated.notify_waiters();
    }
  }
}

#[async_trait]
impl<Item: Send + 'static> Observer<Item> for TestObserver<Item> {
  async fn next(&self, value: Item) { self.record(Notification::Next(value)) }

  async fn error(&self, err: RxError) { self.record(Notification::Error(err)) }

  async fn complete(&self) { self.record(Notification::Completed) }
}
