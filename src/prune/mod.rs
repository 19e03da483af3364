// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Background removal of block data that aged out of the availability window.
//!
//! Progress is kept in a [`Checkpoint`] so that a restarted node resumes where
//! it stopped instead of rescanning the chain.

pub mod checkpoint;
mod error;
mod metrics;
mod pruner;

pub use checkpoint::{Checkpoint, CheckpointStore, MIN_PRUNED_HEIGHT};
pub use error::PruneError;
pub use pruner::{CycleReport, Pruner, PrunerState, PrunerStatus};

use crate::availability::DEFAULT_AVAILABILITY_WINDOW;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, smart_default::SmartDefault)]
#[serde(default)]
pub struct PrunerConfig {
    /// Runs the background pruning loop. Has no effect on archival nodes.
    #[default(true)]
    pub enable_service: bool,
    /// Time between two pruning cycles, in milliseconds.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[default(Duration::from_secs(5 * 60))]
    pub interval: Duration,
    /// Block data older than this is eligible for pruning, in milliseconds.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[default(DEFAULT_AVAILABILITY_WINDOW)]
    pub availability_window: Duration,
    /// Upper bound on the number of heights examined by a single cycle.
    #[default(1024)]
    pub max_heights_per_cycle: u64,
}
