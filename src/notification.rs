//! Notification: the three observer signals as one value.
//!
//! Actors receive notifications through their mailbox and re-dispatch them
//! onto the real observer with [`Notification::accept`].

use crate::{error::RxError, observer::Observer};

#[derive(Debug, Clone)]
pub enum Notification<Item> {
  Next(Item),
  Error(RxError),
  Completed,
}

impl<Item> Notification<Item> {
  /// `true` for `Error` and `Completed`.
  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Notification::Next(_)) }

  pub fn into_value(self) -> Option<Item> {
    match self {
      Notification::Next(v) => Some(v),
      _ => None,
    }
  }

  /// Delivers this notification to `observer`.
  pub async fn accept<O>(self, observer: &O)
  where
    O: Observer<Item> + ?Sized,
  {
    match self {
      Notification::Next(v) => observer.next(v).await,
      Notification::Error(err) => observer.error(err).await,
      Notification::Completed => observer.complete().await,
    }
  }
}

/// Structural equality on values. `Completed` equals `Completed`, which makes
/// it usable as a sentinel that no `Next` can match. Errors are never equal.
impl<Item: PartialEq> PartialEq for Notification<Item> {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Notification::Next(a), Notification::Next(b)) => a == b,
      (Notification::Completed, Notification::Completed) => true,
      _ => false,
    }
  }
}
