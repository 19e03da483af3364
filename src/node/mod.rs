// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Node assembly. Construction runs the retention mode check before anything
//! else touches the store, so a node either starts with a validated store or
//! does not exist at all.

mod store;

pub use store::{CONFIG_FILE_NAME, NodeStore};

use crate::availability::{self, ModeCheck, RetentionMode};
use crate::db::{BlockStore, SettingsStore};
use crate::header::HeaderSource;
use crate::prune::Pruner;
use crate::shrex::{Getter, PeerPools, ShareClient};
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NodeType {
    Bridge,
    #[default]
    Full,
    Light,
}

pub type NodePruner<DB> = Pruner<Arc<DB>, Arc<dyn HeaderSource>, Arc<DB>>;
pub type NodeGetter<DB> = Getter<Arc<dyn HeaderSource>, Arc<DB>, dyn ShareClient>;

pub struct Node<DB> {
    node_type: NodeType,
    mode: RetentionMode,
    mode_check: ModeCheck,
    db: Arc<DB>,
    pruner: Option<NodePruner<DB>>,
    getter: NodeGetter<DB>,
}

impl<DB> Node<DB>
where
    DB: SettingsStore + BlockStore + Send + Sync + 'static,
{
    /// Builds a node on top of `store` with its current configuration.
    ///
    /// Fails with a [`availability::RevertToArchivalError`] (reachable through
    /// [`anyhow::Error::downcast_ref`]) when the store has pruning history
    /// and the configuration asks for an archival node.
    pub fn new(
        store: &NodeStore<DB>,
        headers: Arc<dyn HeaderSource>,
        client: Arc<dyn ShareClient>,
        pools: PeerPools,
    ) -> anyhow::Result<Self> {
        let config = store.config();
        let node_type = config.node.node_type;
        let mode = config.retention_mode();
        let db = store.db().clone();

        let mode_check = availability::check(db.clone(), mode)
            .with_context(|| format!("cannot start {node_type} node in {mode} mode"))?;

        let pruner = if mode == RetentionMode::Pruned && config.pruner.enable_service {
            Some(Pruner::new(
                db.clone(),
                headers.clone(),
                db.clone(),
                config.pruner.clone(),
            )?)
        } else {
            None
        };
        let getter = Getter::new(
            headers,
            db.clone(),
            client,
            pools,
            config.pruner.availability_window,
            config.getter,
        );

        info!(%node_type, %mode, ?mode_check, "node constructed");
        Ok(Self {
            node_type,
            mode,
            mode_check,
            db,
            pruner,
            getter,
        })
    }

    /// Starts background services. Must be called within a tokio runtime.
    pub fn start(&self) -> anyhow::Result<()> {
        if let Some(pruner) = &self.pruner {
            pruner.start()?;
        }
        info!(node_type = %self.node_type, mode = %self.mode, "node started");
        Ok(())
    }

    pub async fn stop(&self) {
        if let Some(pruner) = &self.pruner {
            pruner.stop().await;
        }
        info!(node_type = %self.node_type, "node stopped");
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn mode(&self) -> RetentionMode {
        self.mode
    }

    /// What the retention check did when the node was built.
    pub fn mode_check(&self) -> ModeCheck {
        self.mode_check
    }

    pub fn db(&self) -> &Arc<DB> {
        &self.db
    }

    pub fn pruner(&self) -> Option<&NodePruner<DB>> {
        self.pruner.as_ref()
    }

    pub fn getter(&self) -> &NodeGetter<DB> {
        &self.getter
    }
}
