//! Shared gateway double for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use pet_health_core::gateway::{EntityGateway, RemoteError, RemoteResult, ScoreGateway};
use pet_health_core::models::{Entity, HealthScoreRecord, RawHealthScore};
use pet_health_core::SqliteGateway;

/// Route `tracing` output through the test harness (`RUST_LOG` filters).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Wraps the SQLite gateway with failure injection, call counters and an
/// optional gate that holds mutations in flight until released.
pub struct TestGateway {
    pub inner: SqliteGateway,
    fail_next: Mutex<Option<RemoteError>>,
    fail_lists: AtomicBool,
    fail_scoring: AtomicBool,
    hold: AtomicBool,
    gate: Semaphore,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
    pub lists: AtomicUsize,
    pub calculations: AtomicUsize,
}

impl TestGateway {
    pub fn new() -> Self {
        Self {
            inner: SqliteGateway::open_in_memory().unwrap(),
            fail_next: Mutex::new(None),
            fail_lists: AtomicBool::new(false),
            fail_scoring: AtomicBool::new(false),
            hold: AtomicBool::new(false),
            gate: Semaphore::new(0),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            lists: AtomicUsize::new(0),
            calculations: AtomicUsize::new(0),
        }
    }

    /// The next create/update/delete fails with `error`.
    pub fn fail_next(&self, error: RemoteError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn fail_scoring(&self, fail: bool) {
        self.fail_scoring.store(fail, Ordering::SeqCst);
    }

    /// Hold mutations until [`release`](Self::release) is called.
    pub fn hold(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    /// Let one held mutation through.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    async fn mutation(&self, counter: &AtomicUsize) -> RemoteResult<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.hold.load(Ordering::SeqCst) {
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| RemoteError::Server(e.to_string()))?;
            permit.forget();
        }
        let injected = self.fail_next.lock().unwrap().take();
        match injected {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<E: Entity> EntityGateway<E> for TestGateway {
    async fn list(&self, pet_id: &str) -> RemoteResult<Vec<E>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("list unavailable".into()));
        }
        EntityGateway::<E>::list(&self.inner, pet_id).await
    }

    async fn create(&self, pet_id: &str, input: &E::Input) -> RemoteResult<E> {
        self.mutation(&self.creates).await?;
        EntityGateway::<E>::create(&self.inner, pet_id, input).await
    }

    async fn update(&self, id: &str, patch: &E::Patch) -> RemoteResult<E> {
        self.mutation(&self.updates).await?;
        EntityGateway::<E>::update(&self.inner, id, patch).await
    }

    async fn delete(&self, id: &str) -> RemoteResult<()> {
        self.mutation(&self.deletes).await?;
        EntityGateway::<E>::delete(&self.inner, id).await
    }
}

#[async_trait]
impl ScoreGateway for TestGateway {
    async fn latest_score(&self, pet_id: &str) -> RemoteResult<Option<HealthScoreRecord>> {
        self.inner.latest_score(pet_id).await
    }

    async fn calculate_health_score(&self, pet_id: &str) -> RemoteResult<RawHealthScore> {
        self.calculations.fetch_add(1, Ordering::SeqCst);
        if self.fail_scoring.load(Ordering::SeqCst) {
            return Err(RemoteError::Server("scoring unavailable".into()));
        }
        self.inner.calculate_health_score(pet_id).await
    }

    async fn save_score(&self, pet_id: &str, raw: &RawHealthScore) -> RemoteResult<HealthScoreRecord> {
        self.inner.save_score(pet_id, raw).await
    }
}
