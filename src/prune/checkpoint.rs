// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::db::setting_keys::{CHECKPOINT_KEY, PRUNER_NAMESPACE};
use crate::db::{Namespaced, SettingsStore, SettingsStoreExt as _};
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lowest height pruning can resume from. A checkpoint reset to this value
/// means "start over from genesis".
pub const MIN_PRUNED_HEIGHT: u64 = 1;

/// Pruning progress of a store.
///
/// `last_pruned_height = N` means every height `<= N` has no locally retained
/// block data, except the heights listed in `failed`, which are retried until
/// their deletion succeeds. Zero means pruning never ran against the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub last_pruned_height: u64,
    #[serde(default, with = "failed_heights")]
    pub failed: BTreeSet<u64>,
}

impl Checkpoint {
    /// Checkpoint of a store that is about to be pruned for the first time.
    pub fn initial() -> Self {
        Self {
            last_pruned_height: MIN_PRUNED_HEIGHT,
            failed: BTreeSet::new(),
        }
    }

    /// Non-zero progress proves data was discarded at least once.
    pub fn has_pruned(&self) -> bool {
        self.last_pruned_height > 0
    }

    /// Moves the frontier forward. The frontier never moves back.
    pub fn advance_to(&mut self, height: u64) {
        self.last_pruned_height = self.last_pruned_height.max(height);
    }

    pub fn record_failure(&mut self, height: u64) {
        self.failed.insert(height);
    }

    pub fn clear_failure(&mut self, height: u64) -> bool {
        self.failed.remove(&height)
    }

    /// Drops all progress. Only used when converting an archival store to a
    /// pruned one, where earlier progress cannot be trusted.
    pub fn reset(&mut self) {
        *self = Self::initial();
    }
}

/// `failed` is stored as a JSON object whose keys are the heights and whose
/// values are empty objects: `{"12": {}, "40": {}}`. `null` decodes as empty.
mod failed_heights {
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::{BTreeMap, BTreeSet};

    #[derive(Serialize)]
    struct Empty {}

    pub fn serialize<S: Serializer>(
        set: &BTreeSet<u64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(set.iter().map(|height| (height, Empty {})))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeSet<u64>, D::Error> {
        let map = Option::<BTreeMap<u64, IgnoredAny>>::deserialize(deserializer)?;
        Ok(map.map(|m| m.into_keys().collect()).unwrap_or_default())
    }
}

/// Durable home of the [`Checkpoint`], at `/pruner/checkpoint`.
///
/// A save replaces the stored checkpoint in a single write, so a concurrent
/// load sees either the old or the new checkpoint, never a mix.
pub struct CheckpointStore<DB> {
    ds: Namespaced<DB>,
}

impl<DB: SettingsStore> CheckpointStore<DB> {
    pub fn new(db: DB) -> Self {
        Self {
            ds: Namespaced::new(db, PRUNER_NAMESPACE),
        }
    }

    /// Returns `None` when no checkpoint was ever saved.
    pub fn load(&self) -> anyhow::Result<Option<Checkpoint>> {
        self.ds
            .read_obj(CHECKPOINT_KEY)
            .context("failed to load pruner checkpoint")
    }

    pub fn save(&self, checkpoint: &Checkpoint) -> anyhow::Result<()> {
        self.ds
            .write_obj(CHECKPOINT_KEY, checkpoint)
            .context("failed to persist pruner checkpoint")
    }
}
