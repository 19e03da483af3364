// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::cli_shared::cli::Config;
use crate::cli_shared::read_config;
use crate::db::MemoryDB;
use crate::db::db_engine::{Db, db_root, open_db};
use anyhow::Context as _;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// A node's on-disk home: its configuration and its datastore.
///
/// The datastore outlives configuration changes, which is what lets the
/// retention guard compare a newly configured mode against the store's
/// history.
pub struct NodeStore<DB> {
    path: Option<PathBuf>,
    config: RwLock<Config>,
    db: Arc<DB>,
}

impl NodeStore<Db> {
    /// Opens the store rooted at `path`, creating it if needed. A missing
    /// config file reads as the default configuration.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("failed to create node store at {}", path.display()))?;
        let config_path = path.join(CONFIG_FILE_NAME);
        let config = if config_path.is_file() {
            read_config(Some(&config_path))?
        } else {
            Config::default()
        };
        let db = open_db(&db_root(path), config.db_config())?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            config: RwLock::new(config),
            db: Arc::new(db),
        })
    }

    /// Creates a store at `path` with the given configuration.
    pub fn init(path: &Path, config: Config) -> anyhow::Result<Self> {
        let store = Self::open(path)?;
        store.put_config(config)?;
        Ok(store)
    }
}

impl NodeStore<MemoryDB> {
    pub fn in_memory(config: Config) -> Self {
        Self {
            path: None,
            config: RwLock::new(config),
            db: Default::default(),
        }
    }
}

impl<DB> NodeStore<DB> {
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Replaces the stored configuration. Takes effect for nodes constructed
    /// afterwards.
    pub fn put_config(&self, config: Config) -> anyhow::Result<()> {
        if let Some(path) = &self.path {
            let config_path = path.join(CONFIG_FILE_NAME);
            std::fs::write(&config_path, toml::to_string(&config)?)
                .with_context(|| format!("failed to write {}", config_path.display()))?;
        }
        *self.config.write() = config;
        Ok(())
    }

    pub fn db(&self) -> &Arc<DB> {
        &self.db
    }
}
