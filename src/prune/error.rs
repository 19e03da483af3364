// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::header::HeaderError;

/// Errors raised inside a pruning cycle. None of them stop the service; they
/// are logged and the cycle is retried on the next tick.
#[derive(Debug, thiserror::Error)]
pub enum PruneError {
    /// Deleting the block data at `height` failed. The height is parked in the
    /// checkpoint's failed set.
    #[error("failed to prune height {height}: {source}")]
    PruneAttempt {
        height: u64,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to persist checkpoint: {0:#}")]
    CheckpointPersist(anyhow::Error),
    #[error("failed to load checkpoint: {0:#}")]
    CheckpointLoad(anyhow::Error),
    #[error("header source unavailable: {0}")]
    HeaderSource(#[from] HeaderError),
    #[error("pruner is already running")]
    AlreadyRunning,
}
