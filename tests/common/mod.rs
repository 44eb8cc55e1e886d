#![allow(dead_code)]

use async_trait::async_trait;
use link_shortener::application::{AuditConfig, AuditPublisher, DeletionAggregator, DeletionConfig};
use link_shortener::domain::audit_event::AuditEvent;
use link_shortener::domain::audit_observer::{AuditError, AuditObserver};
use link_shortener::domain::entities::{Link, LinkStats, NewLink};
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::error::AppError;
use link_shortener::infrastructure::persistence::InMemoryLinkRepository;
use link_shortener::state::AppState;
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

pub const BASE_URL: &str = "http://short.test/";

/// Storage fake that records every `delete_batch` call.
///
/// Calls for owners in `failing` return an error, calls for owners in `slow`
/// never finish. A gated repository holds every call until [`Self::release`].
#[derive(Default)]
pub struct RecordingRepository {
    calls: Mutex<Vec<(i64, Vec<String>)>>,
    failing: HashSet<i64>,
    slow: HashSet<i64>,
    gate: Option<Semaphore>,
}

impl RecordingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, owner_id: i64) -> Self {
        self.failing.insert(owner_id);
        self
    }

    pub fn stuck_for(mut self, owner_id: i64) -> Self {
        self.slow.insert(owner_id);
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Lets `calls` held calls complete.
    pub fn release(&self, calls: usize) {
        if let Some(ref gate) = self.gate {
            gate.add_permits(calls);
        }
    }

    pub fn calls(&self) -> Vec<(i64, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    /// Codes handed to storage for `owner_id`, across all calls.
    pub fn codes_for(&self, owner_id: i64) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(owner, _)| *owner == owner_id)
            .flat_map(|(_, codes)| codes)
            .collect()
    }
}

#[async_trait]
impl LinkRepository for RecordingRepository {
    async fn create(&self, _new_link: NewLink) -> Result<Link, AppError> {
        Err(AppError::internal("not supported", json!({})))
    }

    async fn find_by_code(&self, _code: &str) -> Result<Option<Link>, AppError> {
        Ok(None)
    }

    async fn find_by_long_url(&self, _long_url: &str) -> Result<Option<Link>, AppError> {
        Ok(None)
    }

    async fn list_by_owner(&self, _owner_id: i64) -> Result<Vec<Link>, AppError> {
        Ok(Vec::new())
    }

    async fn delete_batch(&self, owner_id: i64, codes: Vec<String>) -> Result<(), AppError> {
        self.calls.lock().unwrap().push((owner_id, codes));

        if let Some(ref gate) = self.gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.slow.contains(&owner_id) {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(&owner_id) {
            return Err(AppError::internal("storage down", json!({})));
        }

        Ok(())
    }

    async fn stats(&self) -> Result<LinkStats, AppError> {
        Ok(LinkStats::default())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Observer fake that records every event it is offered.
pub struct RecordingObserver {
    name: String,
    events: Mutex<Vec<AuditEvent>>,
    fail: bool,
    stuck: bool,
}

impl RecordingObserver {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            events: Mutex::new(Vec::new()),
            fail: false,
            stuck: false,
        }
    }

    /// Records the event, then reports a delivery failure.
    pub fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(name)
        }
    }

    /// Records the event, then never returns.
    pub fn stuck(name: &str) -> Self {
        Self {
            stuck: true,
            ..Self::new(name)
        }
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.url).collect()
    }
}

#[async_trait]
impl AuditObserver for RecordingObserver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn notify(&self, event: &AuditEvent) -> Result<(), AuditError> {
        self.events.lock().unwrap().push(event.clone());

        if self.stuck {
            std::future::pending::<()>().await;
        }
        if self.fail {
            return Err(AuditError::Transport("sink unavailable".to_string()));
        }

        Ok(())
    }
}

/// Polls `condition` until it holds, failing the test after `limit`.
pub async fn wait_until(limit: Duration, mut condition: impl FnMut() -> bool) {
    let step = Duration::from_millis(5);
    let mut waited = Duration::ZERO;

    while !condition() {
        assert!(waited < limit, "condition not met within {limit:?}");
        tokio::time::sleep(step).await;
        waited += step;
    }
}

pub fn codes(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

pub fn sorted(mut codes: Vec<String>) -> Vec<String> {
    codes.sort();
    codes
}

/// Deletions flush on every task so HTTP tests see them after `stop`.
pub fn test_deletion_config() -> DeletionConfig {
    DeletionConfig {
        workers: 2,
        batch_size: 1,
        flush_interval: Duration::from_secs(3600),
        intake_capacity: 16,
        delete_timeout: Duration::from_secs(5),
    }
}

pub struct TestApp {
    pub state: AppState,
    pub repository: Arc<InMemoryLinkRepository>,
    pub audit_log: Arc<RecordingObserver>,
}

/// Application state over in-memory storage with a recording audit sink.
pub async fn create_test_state() -> TestApp {
    let repository = Arc::new(InMemoryLinkRepository::new());
    let deletions = Arc::new(DeletionAggregator::start(
        repository.clone(),
        test_deletion_config(),
    ));
    let audit = Arc::new(AuditPublisher::start(AuditConfig::default()));

    let audit_log = Arc::new(RecordingObserver::new("recording"));
    audit.register(audit_log.clone()).await.unwrap();

    let state = AppState::new(repository.clone(), deletions, audit, BASE_URL.to_string());

    TestApp {
        state,
        repository,
        audit_log,
    }
}

pub async fn create_link(repository: &InMemoryLinkRepository, code: &str, url: &str, owner_id: i64) -> Link {
    repository
        .create(NewLink {
            code: code.to_string(),
            long_url: url.to_string(),
            owner_id,
        })
        .await
        .unwrap()
}
