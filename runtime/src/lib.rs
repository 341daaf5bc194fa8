//! # Storefront Runtime
//!
//! Store runtime for the storefront state container.
//!
//! This crate provides the Store that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state tree and serializes every transition
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Cancellation Registry**: Keeps only the latest request per effect id alive
//!
//! ## Example
//!
//! ```ignore
//! use storefront_runtime::Store;
//!
//! let store = Store::new(AppState::default(), AppReducer::new(), environment);
//!
//! // Dispatch an action
//! store.send(AppAction::Product(ProductAction::LoadProducts)).await?;
//!
//! // Read state
//! let loading = store.state(|s| s.product.is_loading).await;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use std::future::Future;
use std::pin::Pin;
use storefront_core::effect::{Effect, EffectId};
use storefront_core::reducer::Reducer;
use tokio::sync::{watch, RwLock};
use tokio::task::AbortHandle;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use storefront_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Capacity of the action broadcast channel
    pub broadcast_capacity: usize,
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 64,
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects started by
/// that action. Effects of actions fed back later are not included.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(AppAction::Cart(CartAction::GetCarts)).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait until every effect started by the action has finished or been cancelled
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Runs on completion, panic and abort alike.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Cancellation group an effect was started under
#[derive(Debug, Clone)]
struct CancelScope {
    id: EffectId,
    generation: u64,
}

/// A future effect ready to spawn, with the generation it was started under
struct Scheduled<A> {
    future: Pin<Box<dyn Future<Output = Option<A>> + Send>>,
    scope: Option<CancelScope>,
}

#[derive(Default)]
struct ScopeEntry {
    generation: u64,
    tasks: Vec<AbortHandle>,
}

impl ScopeEntry {
    fn abort_all(&mut self) -> usize {
        let mut aborted = 0;
        for task in self.tasks.drain(..) {
            if !task.is_finished() {
                task.abort();
                aborted += 1;
            }
        }
        aborted
    }
}

/// Internal: Tracks in-flight tasks per effect id
///
/// Each id has a generation. Starting a new cancellable effect bumps the
/// generation and aborts every task registered under the previous one.
/// Generations are opened and checked while the store's state write lock is
/// held, so a result from an older generation is never reduced after the
/// action that started a newer one.
#[derive(Default)]
struct CancellationRegistry {
    scopes: Mutex<HashMap<EffectId, ScopeEntry>>,
}

impl CancellationRegistry {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<EffectId, ScopeEntry>> {
        self.scopes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a new generation for `id`, aborting the previous one
    fn begin(&self, id: &EffectId) -> (CancelScope, usize) {
        let mut scopes = self.lock();
        let entry = scopes.entry(id.clone()).or_default();
        entry.generation += 1;
        let aborted = entry.abort_all();

        (
            CancelScope {
                id: id.clone(),
                generation: entry.generation,
            },
            aborted,
        )
    }

    fn register(&self, scope: &CancelScope, task: AbortHandle) {
        let mut scopes = self.lock();
        match scopes.get_mut(&scope.id) {
            Some(entry) if entry.generation == scope.generation => {
                entry.tasks.retain(|t| !t.is_finished());
                entry.tasks.push(task);
            },
            // Superseded between spawn and registration
            _ => task.abort(),
        }
    }

    fn is_current(&self, scope: &CancelScope) -> bool {
        self.lock()
            .get(&scope.id)
            .is_some_and(|entry| entry.generation == scope.generation)
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, CancelScope, CancellationRegistry,
        DecrementGuard, Duration, Effect, EffectHandle, EffectTracking, Future, Ordering, Reducer,
        RwLock, Scheduled, StoreConfig, StoreError,
    };
    use tokio::sync::{broadcast, watch};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; the reducer runs under the write lock so
    ///    transitions are serialized and readers never see a partial update)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop and cancellation)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        pub(crate) cancellation: Arc<CancellationRegistry>,
        /// Bumped after every reduced action
        revision: Arc<watch::Sender<u64>>,
        /// Every action, after it has been reduced
        action_broadcast: broadcast::Sender<A>,
        default_shutdown_timeout: Duration,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));
            let (revision, _) = watch::channel(0);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                cancellation: Arc::new(CancellationRegistry::default()),
                revision: Arc::new(revision),
                action_broadcast,
                default_shutdown_timeout: config.default_shutdown_timeout,
            }
        }

        /// The injected environment
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Number of effects currently running across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown
        ///
        /// New actions are rejected, then this waits for running effects.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(20);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timed out");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tracing::debug!(
                    pending_effects = pending,
                    elapsed_ms = start.elapsed().as_millis(),
                    "Waiting for effects to complete"
                );

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Shut down using the configured default timeout
        ///
        /// # Errors
        ///
        /// See [`Store::shutdown`].
        pub async fn shutdown_default(&self) -> Result<(), StoreError> {
            self.shutdown(self.default_shutdown_timeout).await
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Publishes the action and the new state revision
        /// 4. Opens the cancellation generation of every cancellable effect
        /// 5. Starts the returned effects; their actions are fed back here
        ///
        /// Steps 1 to 4 happen under the write lock. `send()` returns after
        /// starting effect execution, not completion.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            self.send_scoped(action, None).await
        }

        /// Send an action produced by an effect started under `scope`
        ///
        /// The action is dropped when a newer effect under the same id was
        /// started since. The check runs under the write lock, the same lock
        /// under which newer generations are opened.
        #[tracing::instrument(skip(self, action, scope), name = "store_send")]
        pub(crate) async fn send_scoped(
            &self,
            action: A,
            scope: Option<&CancelScope>,
        ) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            let (handle, tracking) = EffectHandle::new();

            let scheduled = {
                let mut state = self.state.write().await;

                if let Some(scope) = scope {
                    if !self.cancellation.is_current(scope) {
                        tracing::debug!(effect_id = %scope.id, "Dropping result of superseded effect");
                        metrics::counter!("store.effects.stale_dropped").increment(1);
                        return Ok(EffectHandle::completed());
                    }
                }

                tracing::debug!("Processing action");
                metrics::counter!("store.actions.total").increment(1);

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self
                    .reducer
                    .reduce(&mut *state, action.clone(), &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                self.revision.send_modify(|revision| *revision += 1);
                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                // No receivers is fine
                let _ = self.action_broadcast.send(action);

                let mut scheduled = Vec::with_capacity(effects.len());
                for effect in effects {
                    self.schedule(effect, None, &mut scheduled);
                }
                scheduled
            };

            for Scheduled { future, scope } in scheduled {
                self.spawn_effect(future, scope, &tracking);
            }

            Ok(handle)
        }

        /// Send an action and wait for a matching result action
        ///
        /// Subscribes to the action broadcast before sending, so a result
        /// produced immediately is not missed. Returns the first action
        /// matching `predicate`; the state already reflects it on return.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: Timeout expired before matching action received
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            R: Clone,
            E: Clone,
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to every action processed by this store
        ///
        /// Each action is published after the reducer has applied it. A lagging
        /// receiver skips old actions and gets `RecvError::Lagged`.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Subscribe to state changes
        ///
        /// The receiver yields a revision number that increases after every
        /// reduced action. Read the new state with [`Store::state`].
        #[must_use]
        pub fn subscribe_state(&self) -> watch::Receiver<u64> {
            self.revision.subscribe()
        }

        /// Number of actions reduced so far
        #[must_use]
        pub fn revision(&self) -> u64 {
            *self.revision.borrow()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.cart.carts.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Flatten `effect` into futures to spawn
        ///
        /// Runs under the state write lock. A cancellable effect bumps the
        /// generation of its id here and aborts the tasks of the previous one,
        /// so no older result can be reduced once the action is.
        fn schedule(
            &self,
            effect: Effect<A>,
            scope: Option<CancelScope>,
            scheduled: &mut Vec<Scheduled<A>>,
        ) {
            match effect {
                Effect::None => {
                    tracing::trace!("Effect::None (no-op)");
                },
                Effect::Future(future) => scheduled.push(Scheduled { future, scope }),
                Effect::Cancellable { id, effect } => {
                    let (scope, aborted) = self.cancellation.begin(&id);
                    if aborted > 0 {
                        tracing::debug!(effect_id = %id, aborted, "Superseded in-flight effects");
                        metrics::counter!("store.effects.cancelled").increment(aborted as u64);
                    }

                    self.schedule(*effect, Some(scope), scheduled);
                },
            }
        }

        /// Spawn an effect future; its action, if any, is fed back
        ///
        /// Inside a cancellable scope the task's abort handle is registered
        /// so a newer request under the same id can stop it. Effect failures
        /// are logged and never halt the store, and a panicking effect is
        /// isolated in its task.
        #[tracing::instrument(skip_all, name = "execute_effect")]
        fn spawn_effect<F>(&self, future: F, scope: Option<CancelScope>, tracking: &EffectTracking)
        where
            F: Future<Output = Option<A>> + Send + 'static,
            R: Clone,
            E: Clone,
        {
            metrics::counter!("store.effects.executed", "type" => "future").increment(1);

            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);

            let guard = DecrementGuard(tracking.clone());
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));
            let store = self.clone();
            let task_scope = scope.clone();

            let handle = tokio::spawn(async move {
                let _guard = guard;
                let _pending_guard = pending_guard;

                let Some(action) = future.await else {
                    tracing::trace!("Effect completed with no action");
                    return;
                };
                if let Err(error) = store.send_scoped(action, task_scope.as_ref()).await {
                    tracing::debug!(%error, "Effect result not dispatched");
                }
            });

            if let Some(scope) = &scope {
                self.cancellation.register(scope, handle.abort_handle());
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                cancellation: Arc::clone(&self.cancellation),
                revision: Arc::clone(&self.revision),
                action_broadcast: self.action_broadcast.clone(),
                default_shutdown_timeout: self.default_shutdown_timeout,
            }
        }
    }
}

pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{cancellable, smallvec, SmallVec};

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
        results: Vec<String>,
    }

    impl TestState {
        const fn new() -> Self {
            Self {
                value: 0,
                results: Vec::new(),
            }
        }
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        ProduceEffect,
        ProduceTwoEffects,
        ProducePanickingEffect,
        Search { query: String, delay_ms: u64 },
        SearchResult { query: String },
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    smallvec![Effect::None]
                },
                TestAction::NoOp => smallvec![Effect::None],
                TestAction::ProduceEffect => {
                    smallvec![Effect::Future(Box::pin(async { Some(TestAction::Increment) }))]
                },
                TestAction::ProduceTwoEffects => {
                    smallvec![
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async {
                            tokio::time::sleep(Duration::from_millis(10)).await;
                            Some(TestAction::Increment)
                        })),
                    ]
                },
                TestAction::ProducePanickingEffect => {
                    #[allow(clippy::panic)] // Intentional panic for testing error handling
                    {
                        smallvec![Effect::Future(Box::pin(async {
                            panic!("Intentional panic in effect for testing");
                        }))]
                    }
                },
                TestAction::Search { query, delay_ms } => {
                    smallvec![cancellable! {
                        id: "search",
                        async {
                            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                            Some(TestAction::SearchResult { query })
                        }
                    }]
                },
                TestAction::SearchResult { query } => {
                    state.results.push(query);
                    smallvec![Effect::None]
                },
            }
        }
    }

    fn store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState::new(), TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn test_store_creation() {
        let store = store();

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 0);
        assert_eq!(store.revision(), 0);
    }

    #[tokio::test]
    async fn test_multiple_actions() {
        let store = store();

        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Decrement).await;

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 1);
        assert_eq!(store.revision(), 3);
    }

    #[tokio::test]
    async fn test_effect_none() {
        let store = store();

        let _ = store.send(TestAction::NoOp).await;
        let value = store.state(|s| s.value).await;
        assert_eq!(value, 0);
    }

    #[tokio::test]
    async fn test_effect_future() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProduceEffect).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_handle_waits_for_every_effect() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProduceTwoEffects).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 2);
        Ok(())
    }

    #[tokio::test]
    #[allow(clippy::panic)]
    async fn test_concurrent_sends() {
        let store = store();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let _ = store.send(TestAction::Increment).await;
                })
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                panic!("concurrent send task panicked: {e}");
            }
        }

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 10);
    }

    #[tokio::test]
    async fn test_store_clone_shares_state() {
        let store1 = store();
        let store2 = store1.clone();

        let _ = store1.send(TestAction::Increment).await;
        assert_eq!(store2.state(|s| s.value).await, 1);

        let _ = store2.send(TestAction::Increment).await;
        assert_eq!(store1.state(|s| s.value).await, 2);
    }

    #[tokio::test]
    async fn test_effect_panic_isolation() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProducePanickingEffect).await?;
        handle.wait().await;

        let _ = store.send(TestAction::Increment).await?;
        let value = store.state(|s| s.value).await;
        assert_eq!(value, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_latest_cancellable_effect_wins() -> Result<(), StoreError> {
        let store = store();

        let _ = store
            .send(TestAction::Search {
                query: "first".to_string(),
                delay_ms: 200,
            })
            .await?;
        let mut handle = store
            .send(TestAction::Search {
                query: "second".to_string(),
                delay_ms: 10,
            })
            .await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        // Give the aborted first request the time it would have needed
        tokio::time::sleep(Duration::from_millis(250)).await;

        let results = store.state(|s| s.results.clone()).await;
        assert_eq!(results, vec!["second".to_string()]);
        assert_eq!(store.pending_effects(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_superseded_effect_handle_still_completes() -> Result<(), StoreError> {
        let store = store();

        let mut first = store
            .send(TestAction::Search {
                query: "slow".to_string(),
                delay_ms: 50,
            })
            .await?;
        let mut second = store
            .send(TestAction::Search {
                query: "fast".to_string(),
                delay_ms: 5,
            })
            .await?;

        first.wait_with_timeout(Duration::from_secs(1)).await?;
        second.wait_with_timeout(Duration::from_secs(1)).await?;

        let results = store.state(|s| s.results.clone()).await;
        assert_eq!(results, vec!["fast".to_string()]);
        Ok(())
    }

    #[test]
    fn test_superseded_generation_is_not_current() {
        let registry = CancellationRegistry::default();
        let id = EffectId::new("search");

        let (first, _) = registry.begin(&id);
        assert!(registry.is_current(&first));

        let (second, _) = registry.begin(&id);
        assert!(!registry.is_current(&first));
        assert!(registry.is_current(&second));
    }

    #[tokio::test]
    async fn test_stale_result_is_dropped_without_reducing() -> Result<(), StoreError> {
        let store = store();
        let (stale, _) = store.cancellation.begin(&EffectId::new("search"));
        let _ = store.cancellation.begin(&EffectId::new("search"));

        let handle = store
            .send_scoped(
                TestAction::SearchResult {
                    query: "stale".to_string(),
                },
                Some(&stale),
            )
            .await?;

        assert!(store.state(|s| s.results.is_empty()).await);
        assert_eq!(store.revision(), 0);
        assert_eq!(format!("{handle:?}"), "EffectHandle { pending_effects: 0, .. }");
        Ok(())
    }

    #[tokio::test]
    async fn test_subscribe_state_notifies_on_change() -> Result<(), StoreError> {
        let store = store();
        let mut rx = store.subscribe_state();

        let _ = store.send(TestAction::Increment).await?;

        tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .map_err(|_| StoreError::Timeout)?
            .map_err(|_| StoreError::ChannelClosed)?;
        assert_eq!(*rx.borrow(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_subscribe_actions_sees_dispatched_and_fed_back_actions() -> Result<(), StoreError>
    {
        let store = store();
        let mut rx = store.subscribe_actions();

        let mut handle = store.send(TestAction::ProduceEffect).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        assert!(matches!(rx.recv().await, Ok(TestAction::ProduceEffect)));
        assert!(matches!(rx.recv().await, Ok(TestAction::Increment)));
        Ok(())
    }

    #[tokio::test]
    async fn test_send_and_wait_for_times_out() {
        let store = store();

        let result = store
            .send_and_wait_for(
                TestAction::NoOp,
                |a| matches!(a, TestAction::SearchResult { .. }),
                Duration::from_millis(20),
            )
            .await;

        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    mod shutdown_tests {
        use super::*;

        #[tokio::test]
        async fn test_shutdown_rejects_new_actions() -> Result<(), StoreError> {
            let store = store();
            store.shutdown(Duration::from_secs(1)).await?;

            let result = store.send(TestAction::Increment).await;
            assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
            Ok(())
        }

        #[tokio::test]
        async fn test_shutdown_waits_for_effects() -> Result<(), StoreError> {
            let store = store();
            let _handle = store.send(TestAction::ProduceTwoEffects).await?;

            store.shutdown(Duration::from_secs(5)).await?;
            assert_eq!(store.pending_effects(), 0);
            Ok(())
        }

        #[tokio::test]
        async fn test_shutdown_timeout() -> Result<(), StoreError> {
            let store = store();
            let _handle = store
                .send(TestAction::Search {
                    query: "slow".to_string(),
                    delay_ms: 500,
                })
                .await?;

            let result = store.shutdown(Duration::from_millis(30)).await;
            assert!(
                matches!(result, Err(StoreError::ShutdownTimeout(pending)) if pending > 0),
                "Expected ShutdownTimeout, got: {result:?}"
            );
            Ok(())
        }

        #[tokio::test]
        async fn test_shutdown_idempotent() {
            let store = store();

            assert!(store.shutdown(Duration::from_secs(1)).await.is_ok());
            assert!(store.shutdown(Duration::from_secs(1)).await.is_ok());
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_store_config_default() {
            let config = StoreConfig::default();
            assert_eq!(config.broadcast_capacity, 64);
            assert_eq!(config.default_shutdown_timeout, Duration::from_secs(30));
        }

        #[tokio::test]
        async fn test_store_with_config_uses_shutdown_timeout() -> Result<(), StoreError> {
            let config = StoreConfig::default().with_shutdown_timeout(Duration::from_millis(500));
            let store = Store::with_config(TestState::new(), TestReducer, TestEnv, config);

            let _ = store.send(TestAction::ProduceTwoEffects).await?;
            store.shutdown_default().await
        }
    }
}
