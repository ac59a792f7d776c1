//! Operator implementations.
//!
//! Each operator is a struct holding its source and parameters, built
//! through a method of [`ObservableExt`](crate::observable::ObservableExt).

pub mod choose;
pub mod debounce;
pub mod delay;
pub mod distinct_until_changed;
pub mod filter;
pub mod map;
pub mod sample;
pub mod skip;
pub mod skip_last;
pub(crate) mod slice;
pub mod take;
pub mod take_last;
pub mod take_until;
pub mod with_latest_from;
pub mod zip_seq;
