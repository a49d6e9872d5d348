use super::*;
use std::collections::HashSet;
use std::sync::atomic::AtomicU32;

#[derive(Default)]
struct MockFactory {
    inits: AtomicUsize,
    creates: AtomicUsize,
    /// Number of upcoming `create` calls that fail.
    failures_left: AtomicU32,
    delay: Duration,
}

impl MockFactory {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    fn failing(times: u32) -> Self {
        Self {
            failures_left: AtomicU32::new(times),
            ..Default::default()
        }
    }
}

#[async_trait]
impl EngineFactory for MockFactory {
    async fn initialize(&self, _env: &EngineEnvironment) -> Result<(), PoolError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create(&self, _id: EngineId) -> Result<(), PoolError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            Err(PoolError::CreationFailed("mock failure".into()))
        } else {
            Ok(())
        }
    }
}

fn fast_settings() -> PoolSettings {
    PoolSettings {
        acquire_timeout: Duration::from_secs(5),
        create_retries: 2,
        retry_backoff: Duration::from_millis(1),
    }
}

async fn ready_pool(factory: Arc<MockFactory>, settings: PoolSettings) -> EnginePool {
    let pool = EnginePool::new(factory, settings);
    pool.initialize(&EngineEnvironment::new("/tmp/appshell-test"))
        .await
        .unwrap();
    pool
}

#[tokio::test]
async fn acquire_before_initialize_is_an_error() {
    let pool = EnginePool::new(Arc::new(MockFactory::default()), fast_settings());
    assert!(!pool.is_initialized());
    assert_eq!(pool.acquire().await, Err(PoolError::NotInitialized));
}

#[tokio::test]
async fn initialize_runs_factory_once() {
    let factory = Arc::new(MockFactory::default());
    let pool = EnginePool::new(factory.clone(), fast_settings());
    let env = EngineEnvironment::new("/tmp/appshell-test");

    let (a, b) = tokio::join!(pool.initialize(&env), pool.initialize(&env));
    a.unwrap();
    b.unwrap();
    pool.initialize(&env).await.unwrap();

    assert!(pool.is_initialized());
    assert_eq!(factory.inits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn acquire_on_empty_pool_creates_an_instance() {
    let factory = Arc::new(MockFactory::default());
    let pool = ready_pool(factory.clone(), fast_settings()).await;

    let instance = pool.acquire().await.unwrap();
    assert_eq!(pool.created_count(), 1);
    assert_eq!(factory.creates.load(Ordering::SeqCst), 1);
    assert_eq!(pool.idle_count(), 0);
    pool.release(instance);
    assert_eq!(pool.idle_count(), 1);
}

#[tokio::test]
async fn release_then_acquire_returns_the_same_instance() {
    let pool = ready_pool(Arc::new(MockFactory::default()), fast_settings()).await;

    let first = pool.acquire().await.unwrap();
    let id = first.id();
    pool.release(first);

    let again = pool.acquire().await.unwrap();
    assert_eq!(again.id(), id);
    assert_eq!(pool.created_count(), 1);
}

#[tokio::test]
async fn idle_queue_is_fifo() {
    let pool = ready_pool(Arc::new(MockFactory::default()), fast_settings()).await;

    let a = pool.acquire().await.unwrap();
    let b = pool.acquire().await.unwrap();
    let (a_id, b_id) = (a.id(), b.id());
    pool.release(a);
    pool.release(b);

    assert_eq!(pool.acquire().await.unwrap().id(), a_id);
    assert_eq!(pool.acquire().await.unwrap().id(), b_id);
}

#[tokio::test]
async fn concurrent_acquires_all_complete() {
    const N: usize = 8;
    let factory = Arc::new(MockFactory::with_delay(Duration::from_millis(10)));
    let pool = ready_pool(factory, fast_settings()).await;

    let tasks: Vec<_> = (0..N)
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move { pool.acquire().await })
        })
        .collect();

    let results = tokio::time::timeout(
        Duration::from_secs(5),
        futures_util::future::join_all(tasks),
    )
    .await
    .expect("acquires should not hang");

    let ids: HashSet<EngineId> = results
        .into_iter()
        .map(|r| r.unwrap().unwrap().id())
        .collect();
    assert_eq!(ids.len(), N);
    assert!(pool.created_count() >= N);
    assert_eq!(pool.waiting_count(), 0);
}

#[tokio::test]
async fn created_never_falls_below_outstanding() {
    let pool = ready_pool(Arc::new(MockFactory::default()), fast_settings()).await;
    let mut outstanding = Vec::new();

    for round in 0..5 {
        for _ in 0..=round {
            outstanding.push(pool.acquire().await.unwrap());
            assert!(pool.created_count() >= outstanding.len());
        }
        for instance in outstanding.drain(..round) {
            pool.release(instance);
        }
        assert!(pool.created_count() >= outstanding.len() + pool.idle_count());
    }
}

#[tokio::test]
async fn released_instance_goes_to_waiting_caller() {
    let factory = Arc::new(MockFactory::with_delay(Duration::from_millis(500)));
    let pool = ready_pool(factory, fast_settings()).await;
    let held = EngineInstance::new(EngineId(999));

    let waiter = {
        let pool = pool.clone();
        tokio::spawn(async move { pool.acquire().await })
    };
    while pool.waiting_count() == 0 {
        tokio::task::yield_now().await;
    }

    pool.release(held);
    let got = waiter.await.unwrap().unwrap();
    assert_eq!(got.id(), EngineId(999));
}

#[tokio::test]
async fn transient_creation_failure_is_retried() {
    let factory = Arc::new(MockFactory::failing(1));
    let pool = ready_pool(factory.clone(), fast_settings()).await;

    assert!(pool.acquire().await.is_ok());
    assert_eq!(factory.creates.load(Ordering::SeqCst), 2);
    assert_eq!(pool.created_count(), 1);
}

#[tokio::test]
async fn persistent_creation_failure_reaches_the_waiter() {
    let factory = Arc::new(MockFactory::failing(u32::MAX));
    let settings = PoolSettings {
        create_retries: 1,
        ..fast_settings()
    };
    let pool = ready_pool(factory.clone(), settings).await;

    let err = pool.acquire().await.unwrap_err();
    assert!(matches!(err, PoolError::CreationFailed(_)));
    assert_eq!(factory.creates.load(Ordering::SeqCst), 2);
    assert_eq!(pool.created_count(), 0);
}

#[tokio::test]
async fn acquire_times_out_when_creation_is_slow() {
    let factory = Arc::new(MockFactory::with_delay(Duration::from_millis(300)));
    let settings = PoolSettings {
        acquire_timeout: Duration::from_millis(20),
        ..fast_settings()
    };
    let pool = ready_pool(factory, settings).await;

    assert_eq!(
        pool.acquire().await,
        Err(PoolError::Timeout(Duration::from_millis(20)))
    );

    // The abandoned creation still lands in the idle queue.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(pool.idle_count(), 1);
    assert_eq!(pool.waiting_count(), 0);
}

#[tokio::test]
async fn prewarm_fills_idle_queue() {
    let factory = Arc::new(MockFactory::default());
    let pool = ready_pool(factory.clone(), fast_settings()).await;

    assert_eq!(pool.prewarm(3).await.unwrap(), 3);
    assert_eq!(pool.idle_count(), 3);

    let _instance = pool.acquire().await.unwrap();
    assert_eq!(pool.idle_count(), 2);
    assert_eq!(factory.creates.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn prewarm_reports_failures_without_failing_waiters() {
    let factory = Arc::new(MockFactory::failing(u32::MAX));
    let settings = PoolSettings {
        create_retries: 0,
        ..fast_settings()
    };
    let pool = ready_pool(factory, settings).await;

    assert_eq!(pool.prewarm(2).await.unwrap(), 0);
    assert_eq!(pool.idle_count(), 0);
}
