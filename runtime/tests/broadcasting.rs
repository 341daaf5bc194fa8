//! Integration tests for Store action broadcasting
//!
//! Tests the action observation features that let a caller dispatch a request
//! and wait for its terminal success or failure action.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::sync::Arc;
use std::time::Duration;
use storefront_core::{cancellable, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use storefront_runtime::{Store, StoreConfig, StoreError};
use tokio::sync::broadcast::error::TryRecvError;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TestAction {
    /// Start a checkout with a request id
    Checkout { id: u64 },
    /// Checkout step completed
    StepCompleted { id: u64, step: u32 },
    /// Checkout finished (terminal action)
    CheckoutCompleted { id: u64 },
    /// Checkout failed (terminal action)
    CheckoutFailed { id: u64, error: String },
    /// Reload the catalogue; only the latest reload may land
    Reload { label: &'static str, delay_ms: u64 },
    /// Catalogue reloaded (terminal action)
    Reloaded { label: &'static str },
    /// Add one item
    AddItem,
    /// Item added
    ItemAdded { count: u32 },
}

#[derive(Debug, Clone, Default)]
struct TestState {
    items: u32,
    steps: Vec<u32>,
    catalogue: Option<&'static str>,
}

#[derive(Clone)]
struct TestEnvironment;

#[derive(Clone)]
struct TestReducer;

impl Reducer for TestReducer {
    type State = TestState;
    type Action = TestAction;
    type Environment = TestEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TestAction::Checkout { id } => smallvec![Effect::Future(Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Some(TestAction::StepCompleted { id, step: 1 })
            }))],
            TestAction::StepCompleted { id, step } => {
                state.steps.push(step);
                if step < 3 {
                    smallvec![Effect::Future(Box::pin(async move {
                        Some(TestAction::StepCompleted { id, step: step + 1 })
                    }))]
                } else {
                    smallvec![Effect::Future(Box::pin(async move {
                        Some(TestAction::CheckoutCompleted { id })
                    }))]
                }
            },
            TestAction::CheckoutCompleted { .. } | TestAction::CheckoutFailed { .. } => {
                smallvec![Effect::None]
            },
            TestAction::Reload { label, delay_ms } => smallvec![cancellable! {
                id: "catalogue/reload",
                async {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    Some(TestAction::Reloaded { label })
                }
            }],
            TestAction::Reloaded { label } => {
                state.catalogue = Some(label);
                smallvec![Effect::None]
            },
            TestAction::AddItem => {
                state.items += 1;
                let count = state.items;
                smallvec![Effect::Future(Box::pin(async move {
                    Some(TestAction::ItemAdded { count })
                }))]
            },
            TestAction::ItemAdded { .. } => smallvec![Effect::None],
        }
    }
}

fn new_store() -> Store<TestState, TestAction, TestEnvironment, TestReducer> {
    Store::new(TestState::default(), TestReducer, TestEnvironment)
}

/// Loads whose results resolve immediately, logged in reduction order
#[derive(Debug, Clone, PartialEq)]
enum LoadAction {
    Load(u32),
    Done(u32),
}

#[derive(Clone)]
struct LoadReducer;

impl Reducer for LoadReducer {
    type State = Vec<LoadAction>;
    type Action = LoadAction;
    type Environment = TestEnvironment;

    fn reduce(
        &self,
        log: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        log.push(action.clone());
        match action {
            LoadAction::Load(n) => smallvec![cancellable! {
                id: "load",
                async { Some(LoadAction::Done(n)) }
            }],
            LoadAction::Done(_) => smallvec![Effect::None],
        }
    }
}

async fn wait_until_idle<S, A, E, R>(store: &Store<S, A, E, R>)
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    tokio::time::timeout(Duration::from_secs(1), async {
        while store.pending_effects() > 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("effects still running");
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_send_and_wait_for_immediate() {
    let store = new_store();

    let result = store
        .send_and_wait_for(
            TestAction::AddItem,
            |action| matches!(action, TestAction::ItemAdded { .. }),
            Duration::from_secs(1),
        )
        .await;

    assert_eq!(result.unwrap(), TestAction::ItemAdded { count: 1 });
}

#[tokio::test]
async fn test_send_and_wait_for_multi_step_flow() {
    let store = new_store();

    let result = store
        .send_and_wait_for(
            TestAction::Checkout { id: 42 },
            |action| matches!(action, TestAction::CheckoutCompleted { id: 42 }),
            Duration::from_secs(1),
        )
        .await;

    assert_eq!(result.unwrap(), TestAction::CheckoutCompleted { id: 42 });

    // The terminal action is observed after it was reduced
    let steps = store.state(|s| s.steps.clone()).await;
    assert_eq!(steps, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_send_and_wait_for_timeout() {
    let store = new_store();

    let result = store
        .send_and_wait_for(
            TestAction::Checkout { id: 99 },
            |action| matches!(action, TestAction::CheckoutFailed { id: 99, .. }),
            Duration::from_millis(50),
        )
        .await;

    assert!(matches!(result, Err(StoreError::Timeout)));
}

#[tokio::test]
async fn test_concurrent_waiters_filter_by_request_id() {
    let store = Arc::new(new_store());

    let mut handles = vec![];
    for id in 1..=5 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .send_and_wait_for(
                    TestAction::Checkout { id },
                    move |action| {
                        matches!(action, TestAction::CheckoutCompleted { id: done } if *done == id)
                    },
                    Duration::from_secs(2),
                )
                .await
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.await.expect("Task panicked");
        let expected = u64::try_from(i + 1).unwrap();
        assert_eq!(result.unwrap(), TestAction::CheckoutCompleted { id: expected });
    }

    assert_eq!(store.state(|s| s.steps.len()).await, 15);
}

#[tokio::test]
async fn test_waiting_for_latest_reload_ignores_superseded_request() {
    let store = Arc::new(new_store());

    let slow = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .send_and_wait_for(
                    TestAction::Reload {
                        label: "stale",
                        delay_ms: 100,
                    },
                    |action| matches!(action, TestAction::Reloaded { label: "stale" }),
                    Duration::from_millis(300),
                )
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;

    let fresh = store
        .send_and_wait_for(
            TestAction::Reload {
                label: "fresh",
                delay_ms: 5,
            },
            |action| matches!(action, TestAction::Reloaded { .. }),
            Duration::from_secs(1),
        )
        .await;

    assert_eq!(fresh.unwrap(), TestAction::Reloaded { label: "fresh" });
    assert!(matches!(slow.await.unwrap(), Err(StoreError::Timeout)));
    assert_eq!(store.state(|s| s.catalogue).await, Some("fresh"));
}

#[tokio::test]
async fn test_subscribe_actions_streams_in_order() {
    let store = new_store();
    let mut rx = store.subscribe_actions();

    store
        .send_and_wait_for(
            TestAction::Checkout { id: 7 },
            |action| matches!(action, TestAction::CheckoutCompleted { .. }),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    let actions: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
    assert_eq!(
        actions,
        vec![
            TestAction::Checkout { id: 7 },
            TestAction::StepCompleted { id: 7, step: 1 },
            TestAction::StepCompleted { id: 7, step: 2 },
            TestAction::StepCompleted { id: 7, step: 3 },
            TestAction::CheckoutCompleted { id: 7 },
        ]
    );
}

#[tokio::test]
async fn test_lagging_subscriber() {
    let store = Store::with_config(
        TestState::default(),
        TestReducer,
        TestEnvironment,
        StoreConfig::default().with_broadcast_capacity(4),
    );

    let mut rx = store.subscribe_actions();

    for _ in 0..20 {
        store.send(TestAction::AddItem).await.ok();
    }
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut received = 0;
    let mut lagged = false;
    loop {
        match rx.try_recv() {
            Ok(_) => received += 1,
            Err(TryRecvError::Lagged(_)) => lagged = true,
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }

    assert!(lagged, "Expected subscriber to lag");
    assert!(received > 0);
    assert!(received < 40);

    // The store itself is unaffected by a slow observer
    assert_eq!(store.state(|s| s.items).await, 20);
}

#[tokio::test]
async fn test_multiple_independent_subscribers() {
    let store = new_store();

    let mut rx1 = store.subscribe_actions();
    let mut rx2 = store.subscribe_actions();

    let mut handle = store.send(TestAction::AddItem).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    let count1 = std::iter::from_fn(|| rx1.try_recv().ok()).count();
    let count2 = std::iter::from_fn(|| rx2.try_recv().ok()).count();

    // AddItem and ItemAdded
    assert_eq!(count1, 2);
    assert_eq!(count2, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_superseded_result_never_lands_after_newer_request() {
    for _ in 0..300 {
        let store = Store::new(Vec::new(), LoadReducer, TestEnvironment);

        store.send(LoadAction::Load(1)).await.unwrap();
        store.send(LoadAction::Load(2)).await.unwrap();
        wait_until_idle(&store).await;

        let log = store.state(Vec::clone).await;
        let newer = log.iter().position(|a| *a == LoadAction::Load(2)).unwrap();
        assert!(
            !log[newer..].contains(&LoadAction::Done(1)),
            "older result reduced after the newer load: {log:?}"
        );
        assert_eq!(log.last(), Some(&LoadAction::Done(2)));
    }
}
