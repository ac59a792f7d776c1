use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Shared, mutable state owned by one subscription.
///
/// Guards must never be held across an `.await`: take what is needed out of
/// the guard, drop it, then call the downstream observer.
#[derive(Default)]
pub struct MutArc<T>(Arc<Mutex<T>>);

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(Arc::new(Mutex::new(t))) }

  #[inline]
  pub fn lock(&self) -> MutexGuard<'_, T> { self.0.lock() }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> From<T> for MutArc<T> {
  fn from(t: T) -> Self { Self::own(t) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clones_share_state() {
    let a = MutArc::own(vec![1]);
    let b = a.clone();
    b.lock().push(2);
    assert_eq!(*a.lock(), vec![1, 2]);
  }
}
