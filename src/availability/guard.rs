// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{PreviousModeRecord, RetentionMode};
use crate::db::SettingsStore;
use crate::prune::{Checkpoint, CheckpointStore};
use tracing::{info, warn};

/// Returned when a store with provable pruning history is asked to run as an
/// archival node. Not recoverable without a fresh store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "node has been run with pruner enabled before (last pruned height {last_pruned_height}, previous mode {}), it is not safe to convert to an archival node",
    previous_mode.map(|m| m.to_string()).unwrap_or_else(|| "unrecorded".into())
)]
pub struct RevertToArchivalError {
    pub last_pruned_height: u64,
    pub previous_mode: Option<RetentionMode>,
}

/// What the guard did to let the node start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeCheck {
    /// The store keeps running in the mode it ran in before.
    Unchanged,
    /// Pruning is enabled on this store for the first time.
    FirstPruningRun,
    /// An archival store became a pruned one; its checkpoint was reset.
    ConvertedToPruned,
}

/// Decides whether a store may run under `configured`.
///
/// Must run once, before the pruner or any getter touches the store. Errors
/// from reading or writing the store are returned as-is; a disallowed mode
/// change surfaces as [`RevertToArchivalError`] inside the [`anyhow::Error`].
pub fn check<DB>(db: DB, configured: RetentionMode) -> anyhow::Result<ModeCheck>
where
    DB: SettingsStore + Clone,
{
    let record = PreviousModeRecord::new(db.clone());
    let checkpoints = CheckpointStore::new(db);

    let previous = record.load()?;
    let checkpoint = checkpoints.load()?;
    let last_pruned_height = checkpoint
        .as_ref()
        .map(|cp| cp.last_pruned_height)
        .unwrap_or_default();

    let outcome = match configured {
        RetentionMode::Archival => {
            // The checkpoint is the source of truth for discarded data; the
            // record covers a pruned run that never advanced the checkpoint.
            if last_pruned_height > 0 || previous == Some(RetentionMode::Pruned) {
                warn!(
                    last_pruned_height,
                    ?previous,
                    "refusing to run an archival node on a pruned store"
                );
                return Err(RevertToArchivalError {
                    last_pruned_height,
                    previous_mode: previous,
                }
                .into());
            }
            ModeCheck::Unchanged
        }
        RetentionMode::Pruned => match (previous, checkpoint) {
            (Some(RetentionMode::Archival), Some(mut checkpoint)) if checkpoint.has_pruned() => {
                info!(
                    last_pruned_height,
                    "converting archival store to pruned, resetting pruner checkpoint"
                );
                checkpoint.reset();
                // the reset must land before the record flips, otherwise a
                // crash in between would leave stale progress trusted
                checkpoints.save(&checkpoint)?;
                ModeCheck::ConvertedToPruned
            }
            (_, checkpoint) if !checkpoint.as_ref().is_some_and(Checkpoint::has_pruned) => {
                ModeCheck::FirstPruningRun
            }
            _ => ModeCheck::Unchanged,
        },
    };

    if previous != Some(configured) {
        record.store(configured)?;
    }
    Ok(outcome)
}
