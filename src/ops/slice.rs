//! Python-style slicing, composed from the windowing operators.
//!
//! | argument     | operator                     |
//! |--------------|------------------------------|
//! | `start >= 0` | `skip(start)`                |
//! | `start < 0`  | `take_last(-start)`          |
//! | `stop > 0`   | `take(stop - start)`         |
//! | `stop < 0`   | `skip_last(-stop)`           |
//! | `step > 1`   | `filteri(i % step == 0)`     |
//!
//! Parameters are validated before anything is composed, so an invalid slice
//! never reaches a subscription.

use crate::{
  error::ConfigError,
  observable::{BoxedObservable, Observable, ObservableExt},
};

pub(crate) fn slice<S>(
  source: S,
  start: Option<isize>,
  stop: Option<isize>,
  step: isize,
) -> Result<BoxedObservable<S::Item>, ConfigError>
where
  S: Observable + 'static,
{
  if step <= 0 {
    return Err(ConfigError::UnsupportedStep { step });
  }
  let take_count = match stop {
    Some(stop) if stop > 0 => {
      let count = stop - start.unwrap_or(0);
      if count < 0 {
        return Err(ConfigError::NegativeCount { count });
      }
      Some(count.unsigned_abs())
    }
    _ => None,
  };

  let mut sliced = source.boxed();
  match start {
    Some(start) if start < 0 => sliced = sliced.take_last(start.unsigned_abs()).boxed(),
    Some(start) if start > 0 => sliced = sliced.skip(start.unsigned_abs()).boxed(),
    _ => {}
  }
  match (stop, take_count) {
    (_, Some(count)) => sliced = sliced.take(count).boxed(),
    (Some(stop), None) if stop < 0 => sliced = sliced.skip_last(stop.unsigned_abs()).boxed(),
    _ => {}
  }
  if step > 1 {
    let step = step.unsigned_abs();
    sliced = sliced.filteri(move |_, i| i % step == 0).boxed();
  }
  Ok(sliced)
}
