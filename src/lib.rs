//! # rxasync: asynchronous Reactive Extensions on tokio
//!
//! Observables push values into observers whose methods are `async`: a
//! producer awaits each observer call before it emits the next value, so
//! backpressure comes for free. Operators that merge signals from several
//! tasks (timers, secondary sources) serialize them through a mailbox actor
//! instead of sharing locked state.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxasync::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() {
//! let observer = TestObserver::new();
//! observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .delay(Duration::from_millis(10))
//!   .subscribe(observer.clone())
//!   .await;
//! observer.wait_terminal().await;
//! assert_eq!(observer.values(), vec![0, 4, 8, 12, 16]);
//! # }
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A reusable source; `actual_subscribe` starts one subscription |
//! | [`ObservableExt`] | Every operator, as a chaining method |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`SubscriptionLike`] | Handle to cancel an active subscription |
//! | [`Mailbox`] | The sequential actor behind the time-based operators |
//!
//! Every operator guarantees at most one terminal event per subscription,
//! and releases its upstream as soon as that event was delivered.
//!
//! [`Observable`]: observable::Observable
//! [`ObservableExt`]: observable::ObservableExt
//! [`Observer`]: observer::Observer
//! [`SubscriptionLike`]: subscription::SubscriptionLike
//! [`Mailbox`]: mailbox::Mailbox

pub mod auto_detach;
pub mod error;
pub mod mailbox;
pub mod notification;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscription;
pub mod testing;

// Re-export the prelude module
pub use prelude::*;

pub use crate::scheduler::{Duration, Instant};
