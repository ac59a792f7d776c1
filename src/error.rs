//! Error types
//!
//! Two families of errors exist. [`ConfigError`] is raised while a pipeline
//! is being built and never reaches an observer. [`RxError`] travels through
//! a subscription as the terminal `error` signal.

use std::{error::Error as StdError, sync::Arc};

type DynError = Arc<dyn StdError + Send + Sync>;

/// The error carried by [`Notification::Error`] and [`Observer::error`].
///
/// Cheap to clone, so a single failure can be delivered to every observer
/// of a multicast source.
///
/// [`Notification::Error`]: crate::notification::Notification::Error
/// [`Observer::error`]: crate::observer::Observer::error
#[derive(Debug, Clone, thiserror::Error)]
pub enum RxError {
  /// A source emitted an error.
  #[error("upstream error: {0}")]
  Upstream(DynError),

  /// A user supplied reaction (predicate, chooser, ...) failed.
  #[error("reaction failed: {0}")]
  Reaction(DynError),

  /// A plain message, mostly useful in tests and adapters.
  #[error("{0}")]
  Message(String),
}

impl RxError {
  pub fn upstream(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
    Self::Upstream(Arc::from(err.into()))
  }

  pub fn reaction(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
    Self::Reaction(Arc::from(err.into()))
  }

  pub fn msg(msg: impl Into<String>) -> Self { Self::Message(msg.into()) }
}

/// Invalid operator arguments, detected when the operator is constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
  #[error("count cannot be negative, got {count}")]
  NegativeCount { count: isize },

  #[error("step must be a positive integer, got {step} (reversing a stream is not supported)")]
  UnsupportedStep { step: isize },

  #[error("timer period must be greater than zero")]
  ZeroPeriod,
}
