// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{PeerPool, PeerPools, PoolKind, RequestError, ShareClient, ShareRequest, metrics};
use crate::availability::is_within_window;
use crate::db::BlockStore;
use crate::header::{HeaderError, HeaderSource};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, smart_default::SmartDefault)]
#[serde(default)]
pub struct GetterConfig {
    /// Upper bound on a single peer request, in milliseconds. A timed out
    /// request counts as a failure of that peer.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[default(Duration::from_secs(10))]
    pub request_timeout: Duration,
    /// Number of peers asked in parallel.
    #[default(3)]
    pub max_concurrent_requests: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum GetterError {
    /// The height is outside the availability window and no archival peer
    /// could serve it.
    #[error("data at height {height} is not available from any archival peer")]
    NotAvailable { height: u64 },
    #[error("data at height {height} not found")]
    NotFound { height: u64 },
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error("failed to read local block data: {0}")]
    Local(anyhow::Error),
}

/// Runs futures concurrently, at most `max_concurrent_jobs` at a time, and
/// yields the first one that produced a value. Dropping the batch aborts the
/// remaining jobs.
struct RaceBatch<T> {
    tasks: JoinSet<Option<T>>,
    semaphore: Arc<Semaphore>,
}

impl<T> RaceBatch<T>
where
    T: Send + 'static,
{
    fn new(max_concurrent_jobs: usize) -> Self {
        RaceBatch {
            tasks: JoinSet::new(),
            semaphore: Arc::new(Semaphore::new(max_concurrent_jobs.max(1))),
        }
    }

    fn add(&mut self, future: impl Future<Output = Option<T>> + Send + 'static) {
        let sem = self.semaphore.clone();
        self.tasks.spawn(async move {
            let _permit = sem.acquire_owned().await.ok()?;
            future.await
        });
    }

    /// Returns the first value produced, or `None` if every job failed.
    async fn get_first(mut self) -> Option<T> {
        while let Some(result) = self.tasks.join_next().await {
            if let Ok(Some(value)) = result {
                return Some(value);
            }
        }
        None
    }
}

/// Fetches block data, steering requests for heights outside the
/// availability window to archival peers.
///
/// The route is picked per request from the header's block time, so a height
/// moves from the full pool to the archival pool as it ages.
pub struct Getter<H, S, C: ?Sized> {
    headers: H,
    blocks: S,
    client: Arc<C>,
    pools: PeerPools,
    availability_window: Duration,
    config: GetterConfig,
}

impl<H, S, C> Getter<H, S, C>
where
    H: HeaderSource,
    S: BlockStore,
    C: ShareClient + ?Sized + 'static,
{
    pub fn new(
        headers: H,
        blocks: S,
        client: Arc<C>,
        pools: PeerPools,
        availability_window: Duration,
        config: GetterConfig,
    ) -> Self {
        Self {
            headers,
            blocks,
            client,
            pools,
            availability_window,
            config,
        }
    }

    pub fn pools(&self) -> &PeerPools {
        &self.pools
    }

    /// Pool a request for data at a block produced at `block_time` goes to
    /// when the data is not held locally.
    pub fn route(&self, block_time: std::time::SystemTime) -> PoolKind {
        if is_within_window(block_time, self.availability_window) {
            PoolKind::Full
        } else {
            PoolKind::Archival
        }
    }

    pub async fn fetch(&self, height: u64, request: &ShareRequest) -> Result<Bytes, GetterError> {
        let header = self.headers.get_by_height(height).await?;

        if let Some(data) = self
            .blocks
            .get_by_height(height)
            .await
            .map_err(GetterError::Local)?
        {
            return request.select(&data).ok_or(GetterError::NotFound { height });
        }

        let kind = self.route(header.time());
        if kind == PoolKind::Archival {
            metrics::ARCHIVAL_REQUESTS_TOTAL.inc();
        }
        match self.race_pool(self.pools.get(kind), height, request).await {
            Some(data) => Ok(data),
            None if kind == PoolKind::Archival => {
                metrics::NOT_AVAILABLE_TOTAL.inc();
                Err(GetterError::NotAvailable { height })
            }
            None => Err(GetterError::NotFound { height }),
        }
    }

    /// Asks the peers of `pool`, best first, until one of them returns data.
    async fn race_pool(
        &self,
        pool: &Arc<PeerPool>,
        height: u64,
        request: &ShareRequest,
    ) -> Option<Bytes> {
        let peers = pool.top_peers_shuffled();
        if peers.is_empty() {
            debug!(pool = %pool.kind(), height, "no peers to request data from");
            return None;
        }

        let mut batch = RaceBatch::new(self.config.max_concurrent_requests);
        for peer in peers {
            let client = self.client.clone();
            let pool = pool.clone();
            let request = request.clone();
            let timeout = self.config.request_timeout;
            batch.add(async move {
                let started = Instant::now();
                let result = tokio::time::timeout(timeout, client.request(peer, height, &request))
                    .await
                    .unwrap_or(Err(RequestError::Timeout));
                match result {
                    Ok(data) => {
                        pool.log_success(peer, started.elapsed());
                        debug!(
                            pool = %pool.kind(),
                            %peer,
                            height,
                            average_time = ?pool.average_time(&peer),
                            "share request served"
                        );
                        Some(data)
                    }
                    Err(e) => {
                        pool.log_failure(peer, started.elapsed());
                        debug!(pool = %pool.kind(), %peer, height, "share request failed: {e}");
                        None
                    }
                }
            });
        }
        batch.get_first().await
    }
}
