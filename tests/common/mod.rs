// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::Path;

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use canopy::Config;
use canopy::availability::{PreviousModeRecord, RetentionMode};
use canopy::node::NodeStore;
use canopy::prune::{Checkpoint, CheckpointStore};

pub fn tool() -> Command {
    cargo_bin_cmd!("canopy-tool")
}

pub fn config(mode: RetentionMode) -> Config {
    let mut config = Config::default();
    config.availability.mode = mode;
    config
}

/// Lays out a node store at `path` the way a previous run would have left it.
/// The database is closed again before returning.
pub fn seed_store(
    path: &Path,
    configured: RetentionMode,
    previous: Option<RetentionMode>,
    last_pruned_height: Option<u64>,
) {
    let store = NodeStore::init(path, config(configured)).unwrap();
    if let Some(mode) = previous {
        PreviousModeRecord::new(store.db().clone())
            .store(mode)
            .unwrap();
    }
    if let Some(last_pruned_height) = last_pruned_height {
        CheckpointStore::new(store.db().clone())
            .save(&Checkpoint {
                last_pruned_height,
                failed: Default::default(),
            })
            .unwrap();
    }
}
