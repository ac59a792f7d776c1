//! Mailbox: a sequential actor.
//!
//! An operator that receives signals from several concurrent sources (the
//! upstream and its own timers) posts them all into one [`Mailbox`]. A single
//! task owns the [`Inbox`] and reacts to one message at a time, in FIFO order,
//! so the operator state needs no lock.
//!
//! ```
//! # use rxasync::mailbox::Mailbox;
//! # use std::ops::ControlFlow;
//! # use tokio_util::sync::CancellationToken;
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (tx, rx) = tokio::sync::oneshot::channel();
//! let mailbox = Mailbox::start(CancellationToken::new(), |inbox| async move {
//!   let mut tx = Some(tx);
//!   let _ = inbox
//!     .run(0, |sum, v: i32| {
//!       let next = sum + v;
//!       if v == 0 {
//!         let _ = tx.take().map(|tx| tx.send(next));
//!       }
//!       let flow = if v == 0 { ControlFlow::Break(()) } else { ControlFlow::Continue(next) };
//!       async move { Ok(flow) }
//!     })
//!     .await;
//! });
//! mailbox.post(1);
//! mailbox.post(2);
//! mailbox.post(0);
//! assert_eq!(rx.await.unwrap(), 3);
//! # }
//! ```

use std::{future::Future, ops::ControlFlow};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::{error::RxError, subscription::SubscriptionLike};

/// The posting side of an actor. Cheap to clone.
pub struct Mailbox<Msg> {
  tx: UnboundedSender<Msg>,
  token: CancellationToken,
}

/// The receiving side of an actor, owned by its processing task.
pub struct Inbox<Msg> {
  rx: UnboundedReceiver<Msg>,
  token: CancellationToken,
}

impl<Msg: Send + 'static> Mailbox<Msg> {
  /// Spawns `worker` with the inbox of a fresh mailbox.
  ///
  /// Cancelling `token` stops the loop before its next `receive` and turns
  /// every later `post` into a no-op. Must be called inside a tokio runtime.
  pub fn start<F, Fut>(token: CancellationToken, worker: F) -> Self
  where
    F: FnOnce(Inbox<Msg>) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
  {
    let (tx, rx) = unbounded_channel();
    let inbox = Inbox { rx, token: token.clone() };
    tracing::debug!("mailbox: actor started");
    tokio::spawn(worker(inbox));
    Self { tx, token }
  }
}

impl<Msg> Mailbox<Msg> {
  /// Enqueues `msg` without waiting.
  pub fn post(&self, msg: Msg) {
    if self.token.is_cancelled() {
      tracing::trace!("mailbox: cancelled, message dropped");
      return;
    }
    if self.tx.send(msg).is_err() {
      tracing::trace!("mailbox: actor stopped, message dropped");
    }
  }
}

impl<Msg> Clone for Mailbox<Msg> {
  fn clone(&self) -> Self { Self { tx: self.tx.clone(), token: self.token.clone() } }
}

impl<Msg> SubscriptionLike for Mailbox<Msg> {
  fn unsubscribe(&mut self) { self.token.cancel() }

  fn is_closed(&self) -> bool { self.token.is_cancelled() || self.tx.is_closed() }
}

impl<Msg> Inbox<Msg> {
  /// Waits for the next message. `None` once the mailbox is cancelled or
  /// every poster is gone.
  pub async fn receive(&mut self) -> Option<Msg> {
    if self.token.is_cancelled() {
      return None;
    }
    tokio::select! {
      biased;
      _ = self.token.cancelled() => None,
      msg = self.rx.recv() => msg,
    }
  }

  /// The message loop.
  ///
  /// Receives one message, awaits `react(state, msg)` to completion, and
  /// continues with the state it returns. `Break` ends the loop; an error
  /// ends the loop and is returned, and the caller must deliver it
  /// downstream.
  pub async fn run<S, F, Fut>(mut self, initial: S, mut react: F) -> Result<(), RxError>
  where
    F: FnMut(S, Msg) -> Fut,
    Fut: Future<Output = Result<ControlFlow<(), S>, RxError>>,
  {
    let mut state = initial;
    let result = loop {
      let Some(msg) = self.receive().await else {
        break Ok(());
      };
      match react(state, msg).await {
        Ok(ControlFlow::Continue(next)) => state = next,
        Ok(ControlFlow::Break(())) => break Ok(()),
        Err(err) => break Err(err),
      }
    };
    tracing::debug!(cancelled = self.token.is_cancelled(), "mailbox: actor stopped");
    result
  }
}
