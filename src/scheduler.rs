//! Task spawning and time.
//!
//! Every background task of the crate (actor loops, timers, producers of the
//! creation operators) is started through [`spawn_cancellable`], so that
//! disposing a subscription stops the task at its next suspension point.
//! Time comes from `tokio::time`, which lets tests drive all operators with
//! a paused clock.

use std::future::Future;

pub use std::time::Duration;
pub use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Spawns `task` on the current tokio runtime, racing it against `token`.
///
/// Must be called from within a runtime.
pub fn spawn_cancellable<F>(token: CancellationToken, task: F) -> tokio::task::JoinHandle<()>
where
  F: Future<Output = ()> + Send + 'static,
{
  tokio::spawn(async move {
    tokio::select! {
      biased;
      _ = token.cancelled() => {}
      _ = task => {}
    }
  })
}

/// Sleeps until `deadline`, or returns `false` early if `token` is cancelled.
pub async fn sleep_until(deadline: Instant, token: &CancellationToken) -> bool {
  tokio::select! {
    biased;
    _ = token.cancelled() => false,
    _ = tokio::time::sleep_until(deadline) => true,
  }
}
