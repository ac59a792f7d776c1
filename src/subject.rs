//! Subject: an observer and an observable at once.
//!
//! Every value pushed into a [`Subject`] is multicast to the observers
//! subscribed at that moment. Once terminated, the subject replays the
//! terminal signal to late subscribers and drops every registration.

use async_trait::async_trait;

use crate::{
  error::RxError,
  notification::Notification,
  observable::Observable,
  observer::{BoxObserver, Observer},
  rc::MutArc,
  subscription::{BoxSubscription, ClosedSubscription, FnSubscription},
};

pub struct Subject<Item> {
  state: MutArc<State<Item>>,
}

struct State<Item> {
  observers: Vec<(u64, BoxObserver<Item>)>,
  next_id: u64,
  terminal: Option<Notification<Item>>,
}

impl<Item> Default for State<Item> {
  fn default() -> Self { Self { observers: vec![], next_id: 0, terminal: None } }
}

impl<Item> Subject<Item> {
  pub fn new() -> Self { Self { state: MutArc::own(State::default()) } }

  pub fn observer_count(&self) -> usize { self.state.lock().observers.len() }

  pub fn is_terminated(&self) -> bool { self.state.lock().terminal.is_some() }

  fn snapshot(&self) -> Vec<BoxObserver<Item>> {
    self.state.lock().observers.iter().map(|(_, o)| o.clone()).collect()
  }

  /// Records `terminal` and hands back the observers it must reach.
  fn terminate(&self, terminal: Notification<Item>) -> Vec<BoxObserver<Item>> {
    let mut state = self.state.lock();
    if state.terminal.is_some() {
      return vec![];
    }
    state.terminal = Some(terminal);
    state.observers.drain(..).map(|(_, o)| o).collect()
  }
}

impl<Item> Default for Subject<Item> {
  fn default() -> Self { Self::new() }
}

impl<Item> Clone for Subject<Item> {
  fn clone(&self) -> Self { Self { state: self.state.clone() } }
}

#[async_trait]
impl<Item: Clone + Send + 'static> Observer<Item> for Subject<Item> {
  async fn next(&self, value: Item) {
    if self.is_terminated() {
      return;
    }
    for o in self.snapshot() {
      o.next(value.clone()).await;
    }
  }

  async fn error(&self, err: RxError) {
    for o in self.terminate(Notification::Error(err.clone())) {
      o.error(err.clone()).await;
    }
  }

  async fn complete(&self) {
    for o in self.terminate(Notification::Completed) {
      o.complete().await;
    }
  }
}

#[async_trait]
impl<Item: Clone + Send + 'static> Observable for Subject<Item> {
  type Item = Item;

  async fn actual_subscribe(&self, observer: BoxObserver<Item>) -> BoxSubscription {
    let replay = {
      let mut state = self.state.lock();
      if let Some(terminal) = state.terminal.clone() {
        Err(terminal)
      } else {
        let id = state.next_id;
        state.next_id += 1;
        state.observers.push((id, observer.clone()));
        Ok(id)
      }
    };

    match replay {
      Ok(id) => {
        let state = self.state.clone();
        Box::new(FnSubscription::new(move || {
          state.lock().observers.retain(|(i, _)| *i != id);
        }))
      }
      Err(terminal) => {
        terminal.accept(&*observer).await;
        Box::new(ClosedSubscription)
      }
    }
  }
}
