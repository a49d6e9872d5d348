//! Engine instance pool.
//!
//! Engine instances are slow to build, so they are created ahead of need and
//! recycled when windows close. The pool never shrinks.
//!
//! Creation is demand-driven: every `acquire` that finds the idle queue empty
//! enqueues itself as a waiter and starts one creation task. Finished
//! instances (new or released) go to the oldest live waiter first, then to the
//! idle queue. A burst of N acquires can therefore start N creations; extra
//! instances simply stay idle.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use appshell_common::{EngineId, PoolError};
use async_trait::async_trait;
use tokio::sync::{oneshot, OnceCell};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::types::EngineEnvironment;

#[cfg(test)]
mod tests;

/// Builds engine surfaces. Implementations hop onto the UI thread; the pool
/// only ever sees the outcome.
#[async_trait]
pub trait EngineFactory: Send + Sync + 'static {
    /// Establish the shared engine environment. Called at most once
    /// successfully.
    async fn initialize(&self, env: &EngineEnvironment) -> Result<(), PoolError>;

    /// Build one fully initialized, hidden surface registered under `id`.
    async fn create(&self, id: EngineId) -> Result<(), PoolError>;
}

/// Ownership token for one engine surface.
///
/// The surface itself stays on the UI thread; this token is what moves
/// between the pool and the window that holds it. It is deliberately not
/// `Clone`: holding the token is holding the engine.
#[derive(Debug, PartialEq, Eq)]
pub struct EngineInstance {
    id: EngineId,
    created_at: Instant,
}

impl EngineInstance {
    pub fn new(id: EngineId) -> Self {
        Self {
            id,
            created_at: Instant::now(),
        }
    }

    pub fn id(&self) -> EngineId {
        self.id
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }
}

#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub acquire_timeout: Duration,
    /// Extra attempts after a failed creation.
    pub create_retries: u32,
    /// Base delay between attempts; multiplied by the attempt number.
    pub retry_backoff: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            acquire_timeout: Duration::from_secs(30),
            create_retries: 2,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

type Waiter = oneshot::Sender<Result<EngineInstance, PoolError>>;

#[derive(Default)]
struct PoolState {
    idle: VecDeque<EngineInstance>,
    waiters: VecDeque<Waiter>,
}

struct PoolInner {
    factory: Arc<dyn EngineFactory>,
    settings: PoolSettings,
    initialized: OnceCell<()>,
    state: Mutex<PoolState>,
    next_id: AtomicU64,
    created: AtomicUsize,
}

/// Process-wide pool of engine instances. Cheap to clone.
#[derive(Clone)]
pub struct EnginePool {
    inner: Arc<PoolInner>,
}

impl EnginePool {
    pub fn new(factory: Arc<dyn EngineFactory>, settings: PoolSettings) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                factory,
                settings,
                initialized: OnceCell::new(),
                state: Mutex::new(PoolState::default()),
                next_id: AtomicU64::new(1),
                created: AtomicUsize::new(0),
            }),
        }
    }

    /// Establish the engine environment. Idempotent: concurrent and repeated
    /// calls share the first successful initialization. A failure leaves the
    /// pool uninitialized.
    pub async fn initialize(&self, env: &EngineEnvironment) -> Result<(), PoolError> {
        self.inner
            .initialized
            .get_or_try_init(|| async {
                self.inner.factory.initialize(env).await?;
                info!(user_data = %env.user_data_dir.display(), "engine environment ready");
                Ok::<(), PoolError>(())
            })
            .await?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.initialized.initialized()
    }

    /// Take an idle instance, or wait for a freshly created one.
    ///
    /// Fails with `NotInitialized` before [`initialize`](Self::initialize),
    /// `Timeout` when nothing arrives within the configured bound, or the
    /// creation error when the creation serving this waiter gave up.
    pub async fn acquire(&self) -> Result<EngineInstance, PoolError> {
        if !self.is_initialized() {
            return Err(PoolError::NotInitialized);
        }

        let rx = {
            let mut state = self.lock_state();
            if let Some(instance) = state.idle.pop_front() {
                debug!(engine = %instance.id(), "engine taken from idle queue");
                return Ok(instance);
            }
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            rx
        };

        self.spawn_creation(true);

        let limit = self.inner.settings.acquire_timeout;
        match tokio::time::timeout(limit, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(PoolError::Closed),
            Err(_) => {
                warn!(timeout = ?limit, "engine acquire timed out");
                Err(PoolError::Timeout(limit))
            }
        }
    }

    /// Hand an instance back. The caller must have reset it to a neutral
    /// state and must release each acquired instance at most once.
    pub fn release(&self, instance: EngineInstance) {
        debug!(engine = %instance.id(), "engine released");
        self.deliver(instance);
    }

    /// Create `count` extra idle instances in the background. The handle
    /// resolves to how many were actually created.
    pub fn prewarm(&self, count: usize) -> JoinHandle<usize> {
        let creations: Vec<_> = (0..count).map(|_| self.spawn_creation(false)).collect();
        tokio::spawn(async move {
            let created = futures_util::future::join_all(creations)
                .await
                .into_iter()
                .filter(|r| matches!(r, Ok(true)))
                .count();
            info!(requested = count, created, "engine prewarm finished");
            created
        })
    }

    pub fn idle_count(&self) -> usize {
        self.lock_state().idle.len()
    }

    /// Callers currently suspended in `acquire`.
    pub fn waiting_count(&self) -> usize {
        let mut state = self.lock_state();
        state.waiters.retain(|w| !w.is_closed());
        state.waiters.len()
    }

    /// Instances ever created.
    pub fn created_count(&self) -> usize {
        self.inner.created.load(Ordering::SeqCst)
    }

    fn lock_state(&self) -> MutexGuard<'_, PoolState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_creation(&self, on_demand: bool) -> JoinHandle<bool> {
        let pool = self.clone();
        tokio::spawn(async move { pool.create_one(on_demand).await })
    }

    /// Run one creation with bounded retries. A final failure is reported to
    /// the oldest waiter when the creation was demand-triggered.
    async fn create_one(&self, on_demand: bool) -> bool {
        let settings = &self.inner.settings;
        let mut attempt: u32 = 0;
        loop {
            let id = EngineId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
            match self.inner.factory.create(id).await {
                Ok(()) => {
                    self.inner.created.fetch_add(1, Ordering::SeqCst);
                    debug!(engine = %id, "engine created");
                    self.deliver(EngineInstance::new(id));
                    return true;
                }
                Err(e) if attempt < settings.create_retries => {
                    attempt += 1;
                    warn!(engine = %id, attempt, error = %e, "engine creation failed, retrying");
                    tokio::time::sleep(settings.retry_backoff * attempt).await;
                }
                Err(e) => {
                    error!(engine = %id, error = %e, "engine creation failed");
                    if on_demand {
                        self.fail_oldest_waiter(e);
                    }
                    return false;
                }
            }
        }
    }

    fn deliver(&self, instance: EngineInstance) {
        let mut instance = instance;
        let mut state = self.lock_state();
        while let Some(waiter) = state.waiters.pop_front() {
            match waiter.send(Ok(instance)) {
                Ok(()) => return,
                // Waiter gave up (timeout or dropped); try the next one.
                Err(Ok(back)) => instance = back,
                Err(Err(_)) => return,
            }
        }
        state.idle.push_back(instance);
    }

    fn fail_oldest_waiter(&self, error: PoolError) {
        let mut state = self.lock_state();
        while let Some(waiter) = state.waiters.pop_front() {
            if waiter.send(Err(error.clone())).is_ok() {
                return;
            }
        }
    }
}
