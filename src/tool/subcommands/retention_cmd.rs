// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use super::open_existing;
use crate::availability::{self, ModeCheck, PreviousModeRecord, RetentionMode};
use crate::prune::{Checkpoint, CheckpointStore};
use clap::Subcommand;
use serde::Serialize;

#[derive(Debug, Subcommand)]
pub enum RetentionCommands {
    /// Run the retention mode check against a node store the way node
    /// start-up does. An archival store checked for pruned mode gets its
    /// checkpoint reset.
    Check {
        /// Node store directory
        #[arg(long)]
        db: PathBuf,
        /// Mode to check for. Defaults to the mode configured in the store
        #[arg(long)]
        mode: Option<RetentionMode>,
    },
    /// Print the pruning checkpoint and previous mode record as JSON
    Checkpoint {
        /// Node store directory
        #[arg(long)]
        db: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct RetentionState {
    previous_mode: Option<RetentionMode>,
    checkpoint: Option<Checkpoint>,
}

impl RetentionCommands {
    pub async fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Check { db, mode } => {
                let store = open_existing(&db)?;
                let config = store.config();
                let mode = mode.unwrap_or_else(|| config.retention_mode());
                match availability::check(store.db().clone(), mode)? {
                    ModeCheck::Unchanged => println!("{mode} mode allowed"),
                    ModeCheck::FirstPruningRun => {
                        println!("{mode} mode allowed, store has not been pruned yet")
                    }
                    ModeCheck::ConvertedToPruned => println!(
                        "{mode} mode allowed, archival store converted and checkpoint reset"
                    ),
                }
                if mode == RetentionMode::Pruned {
                    println!(
                        "availability window: {}",
                        humantime::format_duration(config.pruner.availability_window)
                    );
                }
                Ok(())
            }
            Self::Checkpoint { db } => {
                let store = open_existing(&db)?;
                let state = RetentionState {
                    previous_mode: PreviousModeRecord::new(store.db().clone()).load()?,
                    checkpoint: CheckpointStore::new(store.db().clone()).load()?,
                };
                println!("{}", serde_json::to_string(&state)?);
                Ok(())
            }
        }
    }
}
