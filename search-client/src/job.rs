//! Start-and-poll controller for long-running backend jobs.
//!
//! [`JobPoller`] is generic over a [`JobApi`], which supplies the two calls
//! that differ between job kinds: starting the job and reading its status.
//! Embedding generation and structure generation are the two kinds the
//! backend offers.

use crate::backend::ArtifactCheck;
use crate::backend::JobBackend;
use crate::error::ClientError;
use crate::error::Result;
use crate::metrics::JobMetrics;
use async_trait::async_trait;
use codesearch_protocol::EmbeddingOptions;
use codesearch_protocol::JobState;
use codesearch_protocol::JobStatus;
use codesearch_protocol::StartAck;
use codesearch_protocol::StartStatus;
use codesearch_protocol::StructureOptions;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::warn;

pub const EMBEDDING_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const STRUCTURE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// The job-specific half of a [`JobPoller`].
#[async_trait]
pub trait JobApi: Send + Sync + 'static {
    type Options: Clone + fmt::Debug + Send + Sync + 'static;

    /// Short human label, e.g. `"embedding"`.
    fn kind(&self) -> &'static str;

    /// Rejects options that must not reach the backend.
    async fn check_ready(&self, _options: &Self::Options) -> Result<()> {
        Ok(())
    }

    async fn start(&self, options: &Self::Options) -> Result<StartAck>;

    async fn status(&self) -> Result<JobStatus>;
}

/// Everything a consumer renders for one job.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobSnapshot {
    pub status: JobStatus,
    /// The start call is in flight.
    pub loading: bool,
    pub error: Option<String>,
}

impl JobSnapshot {
    pub fn is_running(&self) -> bool {
        self.status.state == JobState::Running
    }

    pub fn is_completed(&self) -> bool {
        self.status.state == JobState::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.status.state == JobState::Failed
    }

    pub fn metrics(&self) -> JobMetrics {
        JobMetrics::now(&self.status)
    }
}

struct PollTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl PollTask {
    fn stop(self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

pub struct JobPoller<A: JobApi> {
    api: Arc<A>,
    interval: Duration,
    snapshot: Arc<watch::Sender<JobSnapshot>>,
    poll: Mutex<Option<PollTask>>,
    // Bumped by every reset and restart; a poll only lands if its epoch
    // is still current.
    epoch: Arc<AtomicU64>,
}

impl<A: JobApi> JobPoller<A> {
    pub fn new(api: A, interval: Duration) -> Self {
        let (tx, _rx) = watch::channel(JobSnapshot::default());
        Self {
            api: Arc::new(api),
            interval,
            snapshot: Arc::new(tx),
            poll: Mutex::new(None),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn snapshot(&self) -> JobSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn status(&self) -> JobStatus {
        self.snapshot.borrow().status.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<JobSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn is_polling(&self) -> bool {
        self.lock_poll()
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    fn lock_poll(&self) -> MutexGuard<'_, Option<PollTask>> {
        self.poll.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start the job and begin polling its status.
    ///
    /// Failures are also recorded in the snapshot's `error` so a renderer
    /// can show them without holding on to the returned value. A [`reset`]
    /// that lands while the start is in flight wins: the late answer is
    /// dropped, nothing is polled, and this returns `Ok(())`.
    ///
    /// [`reset`]: Self::reset
    pub async fn start(&self, options: A::Options) -> Result<()> {
        let kind = self.api.kind();
        let mut claimed = None;
        self.snapshot.send_if_modified(|snap| {
            if snap.loading || snap.is_running() {
                return false;
            }
            snap.loading = true;
            snap.error = None;
            claimed = Some(self.epoch.load(Ordering::SeqCst));
            true
        });
        let Some(start_epoch) = claimed else {
            return Err(ClientError::Precondition(format!(
                "{kind} generation is already running"
            )));
        };

        if let Err(err) = self.api.check_ready(&options).await {
            let message = err.to_string();
            info!("{kind} generation rejected: {message}");
            self.update_if_current(start_epoch, |snap| {
                snap.loading = false;
                snap.status = JobStatus::idle();
                snap.error = Some(message);
            });
            return Err(err);
        }
        if self.epoch.load(Ordering::SeqCst) != start_epoch {
            debug!("{kind} generation reset before it was started");
            return Ok(());
        }

        debug!("starting {kind} generation with {options:?}");
        match self.api.start(&options).await {
            Ok(StartAck {
                status: StartStatus::Started,
                message,
            }) => {
                let mut poll_epoch = None;
                self.update_if_current(start_epoch, |snap| {
                    poll_epoch = Some(self.epoch.fetch_add(1, Ordering::SeqCst) + 1);
                    snap.loading = false;
                    snap.status = JobStatus {
                        state: JobState::Running,
                        message: message.unwrap_or_default(),
                        ..JobStatus::default()
                    };
                });
                match poll_epoch {
                    Some(epoch) => {
                        info!("{kind} generation started");
                        self.spawn_poll(epoch);
                    }
                    None => info!("{kind} generation started after a reset; not following it"),
                }
                Ok(())
            }
            Ok(StartAck {
                status: StartStatus::Error,
                message,
            }) => {
                let message =
                    message.unwrap_or_else(|| format!("Failed to start {kind} generation"));
                warn!("{kind} generation refused: {message}");
                self.fail(start_epoch, message.clone());
                Err(ClientError::Backend(message))
            }
            Ok(StartAck {
                status: StartStatus::Unknown,
                ..
            }) => {
                let message = format!("Failed to start {kind} generation");
                warn!("{kind} generation answered with an unknown status");
                self.fail(start_epoch, message.clone());
                Err(ClientError::Backend(message))
            }
            Err(err) => {
                warn!("error starting {kind} generation: {err}");
                self.fail(start_epoch, format!("Failed to start {kind} generation"));
                Err(err)
            }
        }
    }

    // Applies `update` only if no reset or restart happened since `epoch`.
    // The check runs under the snapshot's write lock, and `reset` bumps the
    // epoch before it replaces the snapshot, so the two cannot interleave.
    fn update_if_current<F>(&self, epoch: u64, update: F)
    where
        F: FnOnce(&mut JobSnapshot),
    {
        let mut update = Some(update);
        self.snapshot.send_if_modified(|snap| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            match update.take() {
                Some(update) => {
                    update(snap);
                    true
                }
                None => false,
            }
        });
    }

    fn fail(&self, epoch: u64, message: String) {
        self.update_if_current(epoch, |snap| {
            snap.loading = false;
            snap.status = JobStatus {
                state: JobState::Failed,
                message: message.clone(),
                ..JobStatus::default()
            };
            snap.error = Some(message);
        });
    }

    fn spawn_poll(&self, epoch: u64) {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            self.api.clone(),
            self.interval,
            self.snapshot.clone(),
            cancel.clone(),
            self.epoch.clone(),
            epoch,
        ));
        if let Some(previous) = self.lock_poll().replace(PollTask { cancel, handle }) {
            previous.stop();
        }
    }

    /// Read the current status once, e.g. to pick up a job that was started
    /// elsewhere. Resumes polling when the backend reports it running.
    pub async fn refresh(&self) {
        let kind = self.api.kind();
        let epoch = self.epoch.load(Ordering::SeqCst);
        match self.api.status().await {
            Ok(status) => {
                let running = status.state == JobState::Running;
                let applied = self.snapshot.send_if_modified(|snap| {
                    if self.epoch.load(Ordering::SeqCst) != epoch || snap.loading {
                        return false;
                    }
                    snap.status = status;
                    true
                });
                if applied && running && !self.is_polling() {
                    let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
                    self.spawn_poll(epoch);
                }
            }
            Err(err) => warn!("error fetching {kind} status: {err}"),
        }
    }

    /// Stop polling and return to idle.
    pub fn reset(&self) {
        if let Some(task) = self.lock_poll().take() {
            debug!("cancelling {} status polling", self.api.kind());
            task.stop();
        }
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.snapshot.send_replace(JobSnapshot::default());
    }

    pub fn dismiss_error(&self) {
        self.snapshot.send_if_modified(|snap| snap.error.take().is_some());
    }

    /// Resolve once the job is no longer running: its terminal status, or
    /// the idle status after a reset.
    pub async fn wait_until_finished(&self) -> JobStatus {
        let mut rx = self.subscribe();
        let result = rx
            .wait_for(|snap| !snap.loading && !snap.is_running())
            .await
            .map(|snap| snap.status.clone());
        match result {
            Ok(status) => status,
            Err(_) => self.status(),
        }
    }
}

impl<A: JobApi> Drop for JobPoller<A> {
    fn drop(&mut self) {
        if let Some(task) = self.lock_poll().take() {
            task.stop();
        }
    }
}

async fn poll_loop<A: JobApi>(
    api: Arc<A>,
    interval: Duration,
    snapshot: Arc<watch::Sender<JobSnapshot>>,
    cancel: CancellationToken,
    current_epoch: Arc<AtomicU64>,
    epoch: u64,
) {
    let kind = api.kind();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = api.status() => result,
        };
        match result {
            Ok(status) => {
                let terminal = status.state.is_terminal();
                let state = status.state;
                let applied = snapshot.send_if_modified(|snap| {
                    if current_epoch.load(Ordering::SeqCst) != epoch {
                        return false;
                    }
                    snap.status = status;
                    true
                });
                if !applied {
                    debug!("{kind} poll superseded; stopping");
                    break;
                }
                if terminal {
                    info!("{kind} generation {state}");
                    break;
                }
            }
            // A missed tick must not abort a healthy job.
            Err(err) => warn!("error fetching {kind} status: {err}"),
        }
    }
}

/// Embedding generation. Requires generated structures when an artifact check is set.
pub struct EmbeddingJob {
    backend: Arc<dyn JobBackend>,
    artifact: Option<Arc<dyn ArtifactCheck>>,
}

impl EmbeddingJob {
    pub fn new(backend: Arc<dyn JobBackend>) -> Self {
        Self {
            backend,
            artifact: None,
        }
    }

    pub fn with_artifact_check(mut self, artifact: Arc<dyn ArtifactCheck>) -> Self {
        self.artifact = Some(artifact);
        self
    }
}

#[async_trait]
impl JobApi for EmbeddingJob {
    type Options = EmbeddingOptions;

    fn kind(&self) -> &'static str {
        "embedding"
    }

    async fn check_ready(&self, options: &EmbeddingOptions) -> Result<()> {
        if options.model.trim().is_empty() {
            return Err(ClientError::Precondition(
                "Select an embedding model".to_string(),
            ));
        }
        if options.batch_size == Some(0) {
            return Err(ClientError::Precondition(
                "Batch size must be > 0".to_string(),
            ));
        }
        if let Some(artifact) = &self.artifact
            && !artifact.exists().await?
        {
            return Err(ClientError::Precondition(
                "No code structures found. Generate structures before embeddings.".to_string(),
            ));
        }
        Ok(())
    }

    async fn start(&self, options: &EmbeddingOptions) -> Result<StartAck> {
        self.backend.start_embedding(options).await
    }

    async fn status(&self) -> Result<JobStatus> {
        self.backend.embedding_status().await
    }
}

/// Code structure extraction.
pub struct StructureJob {
    backend: Arc<dyn JobBackend>,
}

impl StructureJob {
    pub fn new(backend: Arc<dyn JobBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl JobApi for StructureJob {
    type Options = StructureOptions;

    fn kind(&self) -> &'static str {
        "structure"
    }

    async fn check_ready(&self, options: &StructureOptions) -> Result<()> {
        if options.target_dir.trim().is_empty() {
            return Err(ClientError::Precondition(
                "Target directory is required".to_string(),
            ));
        }
        if options.pattern.trim().is_empty() {
            return Err(ClientError::Precondition(
                "File pattern is required".to_string(),
            ));
        }
        if options.max_lines == 0 {
            return Err(ClientError::Precondition(
                "Max lines must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    async fn start(&self, options: &StructureOptions) -> Result<StartAck> {
        self.backend.start_structure(options).await
    }

    async fn status(&self) -> Result<JobStatus> {
        self.backend.structure_status().await
    }
}

pub type EmbeddingPoller = JobPoller<EmbeddingJob>;
pub type StructurePoller = JobPoller<StructureJob>;
