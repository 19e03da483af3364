// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::db::setting_keys::{FULL_AVAIL_NAMESPACE, PREVIOUS_MODE_KEY};
use crate::db::{Namespaced, SettingsStore};
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::str::FromStr as _;

/// How much history a node keeps.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RetentionMode {
    /// All historical block data is kept forever.
    #[default]
    Archival,
    /// Block data older than the availability window is discarded.
    Pruned,
}

/// Last retention mode a store ran under, persisted as a raw token
/// (`archival` or `pruned`) at `/full_avail/previous_mode`.
pub struct PreviousModeRecord<DB> {
    ds: Namespaced<DB>,
}

impl<DB: SettingsStore> PreviousModeRecord<DB> {
    pub fn new(db: DB) -> Self {
        Self {
            ds: Namespaced::new(db, FULL_AVAIL_NAMESPACE),
        }
    }

    /// Returns `None` when the store never recorded a mode.
    pub fn load(&self) -> anyhow::Result<Option<RetentionMode>> {
        let Some(raw) = self.ds.read_bin(PREVIOUS_MODE_KEY)? else {
            return Ok(None);
        };
        let token = std::str::from_utf8(&raw).context("previous mode record is not utf-8")?;
        RetentionMode::from_str(token.trim())
            .map(Some)
            .with_context(|| format!("unknown previous mode record: {token:?}"))
    }

    pub fn store(&self, mode: RetentionMode) -> anyhow::Result<()> {
        self.ds
            .write_bin(PREVIOUS_MODE_KEY, mode.to_string().as_bytes())
            .context("failed to persist previous mode record")
    }
}
