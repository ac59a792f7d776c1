//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  error::{ConfigError, RxError},
  notification::Notification,
  observable::{self, BoxedObservable, Observable, ObservableExt},
  observer::{AnonymousObserver, BoxObserver, NotificationObserver, Observer},
  scheduler::{Duration, Instant},
  subject::Subject,
  subscription::{
    BoxSubscription, ClosedSubscription, FnSubscription, SharedSubscription, SubscriptionGuard,
    SubscriptionLike,
  },
  testing::TestObserver,
};
