use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use rxasync::prelude::*;

/// A source that ignores the protocol: it keeps emitting after completing
/// and terminates twice.
fn rogue() -> impl Observable<Item = i32> {
  observable::create(|o: BoxObserver<i32>| async move {
    tokio::spawn(async move {
      o.next(1).await;
      o.next(2).await;
      o.complete().await;
      o.next(3).await;
      o.error(RxError::msg("after completion")).await;
      o.complete().await;
    });
    Box::new(ClosedSubscription) as BoxSubscription
  })
}

async fn settle() { tokio::time::sleep(Duration::from_millis(1)).await }

#[tokio::test(start_paused = true)]
async fn terminal_once_through_every_operator() {
  let pipelines: Vec<BoxedObservable<i32>> = vec![
    rogue().boxed(),
    rogue().filter(|_| true).boxed(),
    rogue().map(|v| v * 10).boxed(),
    rogue().skip(1).boxed(),
    rogue().skip_last(1).boxed(),
    rogue().take(5).boxed(),
    rogue().take_last(5).boxed(),
    rogue().delay(Duration::from_millis(5)).boxed(),
    rogue().debounce(Duration::from_millis(5)).boxed(),
    rogue().distinct_until_changed().boxed(),
    rogue().filteri(|_, _| true).boxed(),
    rogue().slice(Some(0), None, 1).unwrap(),
  ];

  for pipeline in pipelines {
    let observer = TestObserver::new();
    pipeline.subscribe(observer.clone()).await;
    observer.wait_terminal().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(observer.terminal_count(), 1);
    let notifications = observer.notifications();
    let last = notifications.last().expect("at least the terminal signal");
    assert!(last.is_terminal(), "nothing may follow the terminal signal");
    assert!(observer.values().iter().all(|v| *v != 3 && *v != 30));
  }
}

#[tokio::test(start_paused = true)]
async fn take_stops_a_disposal_observant_source() {
  let produced = Arc::new(AtomicUsize::new(0));
  let c_produced = produced.clone();
  let observer = TestObserver::new();
  observable::from_iter(1..=5)
    .map(move |v| {
      c_produced.fetch_add(1, Ordering::SeqCst);
      v
    })
    .take(3)
    .subscribe(observer.clone())
    .await;
  observer.wait_terminal().await;
  settle().await;

  assert_eq!(
    observer.notifications(),
    vec![
      Notification::Next(1),
      Notification::Next(2),
      Notification::Next(3),
      Notification::Completed,
    ]
  );
  assert_eq!(produced.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn slice_matches_its_composition() {
  let source = || observable::from_iter("reactive".chars().collect::<Vec<_>>());

  let sliced = TestObserver::new();
  source().slice(Some(1), Some(-2), 1).unwrap().subscribe(sliced.clone()).await;
  let composed = TestObserver::new();
  source().skip(1).skip_last(2).subscribe(composed.clone()).await;
  sliced.wait_terminal().await;
  composed.wait_terminal().await;

  assert_eq!(sliced.values(), vec!['e', 'a', 'c', 't', 'i']);
  assert_eq!(sliced.values(), composed.values());
}

#[tokio::test(start_paused = true)]
async fn dispose_twice_equals_dispose_once() {
  let subject = Subject::<i32>::new();
  let pipelines: Vec<BoxedObservable<i32>> = vec![
    subject.clone().filter(|v| v % 2 == 0).boxed(),
    subject.clone().take_until(observable::interval(Duration::from_secs(60)).unwrap()).boxed(),
    subject.clone().delay(Duration::from_millis(10)).boxed(),
    subject.clone().debounce(Duration::from_millis(10)).boxed(),
    subject.clone().sample(Duration::from_millis(10)).boxed(),
    subject.clone().distinct_until_changed().boxed(),
  ];

  for pipeline in pipelines {
    let observer = TestObserver::new();
    let mut subscription = pipeline.subscribe(observer.clone()).await;
    subscription.unsubscribe();
    let closed = subscription.is_closed();
    subscription.unsubscribe();

    assert!(closed);
    assert!(subscription.is_closed());
    assert_eq!(subject.observer_count(), 0);
    subject.next(2).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(observer.notifications().is_empty());
  }
}

#[tokio::test(start_paused = true)]
async fn subscription_guard_disposes_on_drop() {
  let subject = Subject::<i32>::new();
  let observer = TestObserver::new();
  {
    let subscription = subject.clone().map(|v| v + 1).subscribe(observer.clone()).await;
    let _guard = SubscriptionGuard::new(subscription);
    subject.next(1).await;
  }
  subject.next(2).await;

  assert_eq!(observer.values(), vec![2]);
  assert_eq!(subject.observer_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn time_operators_compose() {
  let origin = Instant::now();
  let observer = TestObserver::new();
  observable::interval(Duration::from_millis(10))
    .unwrap()
    .take(20)
    .map(|tick| tick / 5)
    .distinct_until_changed()
    .debounce(Duration::from_millis(15))
    .subscribe(observer.clone())
    .await;
  observer.wait_terminal().await;

  let timed = observer.timed_values(origin);
  assert_eq!(timed.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
  assert_eq!(timed[0].0, Duration::from_millis(25));
  assert_eq!(timed[3].0, Duration::from_millis(175));
}

#[tokio::test(start_paused = true)]
async fn anonymous_observer_at_the_end_of_a_pipeline() {
  let sum = Arc::new(AtomicUsize::new(0));
  let (tx, rx) = tokio::sync::oneshot::channel();
  let tx = std::sync::Mutex::new(Some(tx));
  let c_sum = sum.clone();
  let observer = AnonymousObserver::new(move |v: usize| {
    let sum = c_sum.clone();
    async move {
      sum.fetch_add(v, Ordering::SeqCst);
    }
  })
  .on_complete(move || {
    let tx = tx.lock().unwrap().take();
    async move {
      if let Some(tx) = tx {
        let _ = tx.send(());
      }
    }
  });

  observable::from_iter(1..=4usize)
    .choose(|v| (v != 3).then_some(v))
    .subscribe(observer)
    .await;
  rx.await.unwrap();
  assert_eq!(sum.load(Ordering::SeqCst), 7);
}

fn assert_terminal_is_last<T: Clone + Send + 'static>(observer: &TestObserver<T>) {
  let notifications = observer.notifications();
  assert!(notifications.last().is_some_and(|n| n.is_terminal()));
  assert_eq!(notifications.iter().filter(|n| n.is_terminal()).count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn take_until_orders_racing_sources() {
  for _ in 0..200 {
    let source = Subject::<i32>::new();
    let notifier = Subject::<()>::new();
    let observer = TestObserver::new();
    source.clone().take_until(notifier.clone()).subscribe(observer.clone()).await;

    let producer = tokio::spawn(async move {
      for v in 0..500 {
        source.next(v).await;
      }
    });
    let stopper = tokio::spawn(async move {
      tokio::task::yield_now().await;
      notifier.next(()).await;
    });
    producer.await.unwrap();
    stopper.await.unwrap();
    observer.wait_terminal().await;

    assert!(observer.is_completed());
    assert_terminal_is_last(&observer);
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn with_latest_from_orders_racing_sources() {
  for _ in 0..200 {
    let primary = Subject::<i32>::new();
    let secondary = Subject::<i32>::new();
    let observer = TestObserver::new();
    primary.clone().with_latest_from(secondary.clone()).subscribe(observer.clone()).await;
    secondary.next(0).await;

    let producer = tokio::spawn(async move {
      for v in 0..500 {
        primary.next(v).await;
      }
    });
    let failing = tokio::spawn(async move {
      tokio::task::yield_now().await;
      secondary.error(RxError::msg("secondary failed")).await;
    });
    producer.await.unwrap();
    failing.await.unwrap();
    observer.wait_terminal().await;

    assert!(observer.received_error().is_some());
    assert_terminal_is_last(&observer);
  }
}
