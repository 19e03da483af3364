// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{Checkpoint, CheckpointStore, PruneError, PrunerConfig, metrics};
use crate::availability::is_within_window;
use crate::db::{BlockStore, SettingsStore};
use crate::header::{HeaderError, HeaderSource};
use crate::metrics::HistogramTimerExt as _;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

// tokio intervals reject a zero period
const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PrunerState {
    #[default]
    Idle,
    /// Looking for the highest height outside the availability window.
    Scanning,
    /// Deleting block data for newly expired heights.
    Pruning,
    /// Deleting block data for heights that failed in earlier cycles.
    RetryingFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrunerStatus {
    pub state: PrunerState,
    pub last_pruned_height: u64,
    pub pending_failed_count: usize,
}

/// Outcome of a single pruning cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Newly expired heights whose data was deleted.
    pub pruned: u64,
    /// Newly expired heights whose deletion failed and was parked.
    pub failed: u64,
    /// Parked heights whose deletion succeeded on retry.
    pub retried: u64,
    pub last_pruned_height: u64,
}

struct Progress {
    checkpoint: Checkpoint,
    // in-memory checkpoint is ahead of the persisted one
    unsaved: bool,
}

struct Inner<DB, H, S> {
    checkpoints: CheckpointStore<DB>,
    headers: H,
    blocks: S,
    config: PrunerConfig,
    state: RwLock<PrunerState>,
    progress: Mutex<Progress>,
}

struct Running {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Deletes block data that fell out of the availability window.
///
/// One pruner must own a store at a time. The loop is started with
/// [`Pruner::start`] and keeps going until [`Pruner::stop`]; errors inside a
/// cycle are logged and retried on the next tick.
pub struct Pruner<DB, H, S> {
    inner: Arc<Inner<DB, H, S>>,
    task: Mutex<Option<Running>>,
}

impl<DB, H, S> Pruner<DB, H, S>
where
    DB: SettingsStore + Send + Sync + 'static,
    H: HeaderSource + 'static,
    S: BlockStore + 'static,
{
    /// Creates a pruner for the store behind `db`. A store that was never
    /// pruned gets its initial checkpoint persisted right away.
    pub fn new(db: DB, headers: H, blocks: S, config: PrunerConfig) -> anyhow::Result<Self> {
        let checkpoints = CheckpointStore::new(db);
        let checkpoint = match checkpoints.load()? {
            Some(checkpoint) => checkpoint,
            None => {
                let checkpoint = Checkpoint::initial();
                checkpoints.save(&checkpoint)?;
                info!(
                    last_pruned_height = checkpoint.last_pruned_height,
                    "initialised pruner checkpoint"
                );
                checkpoint
            }
        };
        record_metrics(&checkpoint);
        Ok(Self {
            inner: Arc::new(Inner {
                checkpoints,
                headers,
                blocks,
                config,
                state: RwLock::new(PrunerState::Idle),
                progress: Mutex::new(Progress {
                    checkpoint,
                    unsaved: false,
                }),
            }),
            task: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &PrunerConfig {
        &self.inner.config
    }

    /// Spawns the pruning loop. The first cycle runs immediately.
    pub fn start(&self) -> Result<(), PruneError> {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|running| !running.handle.is_finished()) {
            return Err(PruneError::AlreadyRunning);
        }
        let token = CancellationToken::new();
        let handle = tokio::spawn(self.inner.clone().run(token.clone()));
        *task = Some(Running { token, handle });
        Ok(())
    }

    /// Cancels the loop and waits for it to exit. A cycle interrupted by the
    /// cancellation persists its progress before the loop returns.
    pub async fn stop(&self) {
        let Some(Running { token, handle }) = self.task.lock().take() else {
            return;
        };
        token.cancel();
        if let Err(e) = handle.await {
            error!("pruner task failed: {e}");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    pub fn status(&self) -> PrunerStatus {
        let state = *self.inner.state.read();
        let progress = self.inner.progress.lock();
        PrunerStatus {
            state,
            last_pruned_height: progress.checkpoint.last_pruned_height,
            pending_failed_count: progress.checkpoint.failed.len(),
        }
    }

    /// Runs a single cycle in the foreground. Refused while the background
    /// loop owns the store.
    pub async fn run_once(&self) -> Result<CycleReport, PruneError> {
        if self.is_running() {
            return Err(PruneError::AlreadyRunning);
        }
        self.inner.run_cycle(&CancellationToken::new()).await
    }
}

impl<DB, H, S> Inner<DB, H, S>
where
    DB: SettingsStore + Send + Sync + 'static,
    H: HeaderSource + 'static,
    S: BlockStore + 'static,
{
    async fn run(self: Arc<Self>, token: CancellationToken) {
        info!(
            interval = ?self.config.interval,
            availability_window = ?self.config.availability_window,
            "pruner started"
        );
        let mut ticker = tokio::time::interval(self.config.interval.max(MIN_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => (),
            }
            match self.run_cycle(&token).await {
                Ok(report) if report.pruned + report.failed + report.retried > 0 => info!(
                    pruned = report.pruned,
                    failed = report.failed,
                    retried = report.retried,
                    last_pruned_height = report.last_pruned_height,
                    "pruning cycle finished"
                ),
                Ok(_) => debug!("pruning cycle found nothing to prune"),
                Err(e @ PruneError::CheckpointPersist(_)) => {
                    metrics::CYCLE_FAILURES_TOTAL.inc();
                    error!("pruning cycle failed: {e}");
                }
                Err(e) => {
                    metrics::CYCLE_FAILURES_TOTAL.inc();
                    warn!("pruning cycle failed: {e}");
                }
            }
        }
        info!("pruner stopped");
    }

    async fn run_cycle(
        self: &Arc<Self>,
        token: &CancellationToken,
    ) -> Result<CycleReport, PruneError> {
        let _timer = metrics::CYCLE_TIME.start_timer();
        let result = self.prune_expired(token).await;
        self.set_state(PrunerState::Idle);
        result
    }

    async fn prune_expired(
        self: &Arc<Self>,
        token: &CancellationToken,
    ) -> Result<CycleReport, PruneError> {
        let mut checkpoint = self.working_checkpoint()?;
        let retry = checkpoint.failed.iter().copied().collect::<Vec<_>>();
        let mut report = CycleReport::default();

        self.set_state(PrunerState::Scanning);
        let prunable = match self.find_prunable(checkpoint.last_pruned_height, token).await {
            Ok(height) => height,
            Err(e) => {
                if let Err(persist) = self.commit(checkpoint).await {
                    warn!("{persist}");
                }
                return Err(e);
            }
        };

        self.set_state(PrunerState::Pruning);
        for height in checkpoint.last_pruned_height.saturating_add(1)..=prunable {
            match self.prune_height(height, token).await {
                None => break,
                Some(Ok(())) => report.pruned += 1,
                Some(Err(e)) => {
                    warn!(height, "{e}");
                    checkpoint.record_failure(height);
                    report.failed += 1;
                }
            }
            // parked heights do not hold the frontier back
            checkpoint.advance_to(height);
        }

        if !retry.is_empty() && !token.is_cancelled() {
            self.set_state(PrunerState::RetryingFailed);
            for height in retry {
                match self.prune_height(height, token).await {
                    None => break,
                    Some(Ok(())) => {
                        checkpoint.clear_failure(height);
                        report.retried += 1;
                    }
                    Some(Err(e)) => debug!(height, "retry failed: {e}"),
                }
            }
        }

        metrics::PRUNED_TOTAL.inc_by(report.pruned + report.retried);
        report.last_pruned_height = checkpoint.last_pruned_height;
        self.commit(checkpoint).await?;
        Ok(report)
    }

    /// Returns the highest height above `from` whose block time lies outside
    /// the availability window, or `from` when there is none.
    async fn find_prunable(&self, from: u64, token: &CancellationToken) -> Result<u64, PruneError> {
        let head = match token.run_until_cancelled(self.headers.head()).await {
            // nothing synced yet
            None | Some(Err(HeaderError::NotFound(_))) => return Ok(from),
            Some(head) => head?.height(),
        };
        let upper = head.min(from.saturating_add(self.config.max_heights_per_cycle));
        let mut prunable = from;
        for height in from.saturating_add(1)..=upper {
            let header = match token.run_until_cancelled(self.headers.get_by_height(height)).await {
                None | Some(Err(HeaderError::NotFound(_))) => break,
                Some(header) => header?,
            };
            if is_within_window(header.time(), self.config.availability_window) {
                break;
            }
            prunable = height;
        }
        Ok(prunable)
    }

    /// `None` when cancelled before the deletion completed. Deleting data that
    /// is already gone counts as success.
    async fn prune_height(
        &self,
        height: u64,
        token: &CancellationToken,
    ) -> Option<Result<(), PruneError>> {
        token
            .run_until_cancelled(self.blocks.delete_by_height(height))
            .await
            .map(|result| result.map_err(|source| PruneError::PruneAttempt { height, source }))
    }

    /// Checkpoint a cycle starts from: the unsaved one from an earlier cycle if
    /// its save failed, the persisted one otherwise.
    fn working_checkpoint(&self) -> Result<Checkpoint, PruneError> {
        {
            let progress = self.progress.lock();
            if progress.unsaved {
                return Ok(progress.checkpoint.clone());
            }
        }
        Ok(self
            .checkpoints
            .load()
            .map_err(PruneError::CheckpointLoad)?
            .unwrap_or_else(Checkpoint::initial))
    }

    /// Saves on the blocking pool, since a durable write waits for the disk.
    async fn commit(self: &Arc<Self>, checkpoint: Checkpoint) -> Result<(), PruneError> {
        let this = self.clone();
        let to_save = checkpoint.clone();
        let saved = tokio::task::spawn_blocking(move || this.checkpoints.save(&to_save))
            .await
            .map_err(anyhow::Error::from)
            .and_then(|saved| saved);
        record_metrics(&checkpoint);
        let mut progress = self.progress.lock();
        progress.unsaved = saved.is_err();
        progress.checkpoint = checkpoint;
        saved.map_err(PruneError::CheckpointPersist)
    }

    fn set_state(&self, state: PrunerState) {
        *self.state.write() = state;
    }
}

fn record_metrics(checkpoint: &Checkpoint) {
    metrics::LAST_PRUNED_HEIGHT
        .set(i64::try_from(checkpoint.last_pruned_height).unwrap_or(i64::MAX));
    metrics::FAILED_HEIGHTS.set(i64::try_from(checkpoint.failed.len()).unwrap_or(i64::MAX));
}
