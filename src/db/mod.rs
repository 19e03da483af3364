// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod memory;
pub mod parity_db;
pub mod parity_db_config;

pub use memory::MemoryDB;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub mod setting_keys {
    /// Namespace owned by the pruner service.
    pub const PRUNER_NAMESPACE: &str = "pruner";
    /// Pruning progress, stored under [`PRUNER_NAMESPACE`].
    pub const CHECKPOINT_KEY: &str = "checkpoint";
    /// Namespace owned by the full availability component.
    pub const FULL_AVAIL_NAMESPACE: &str = "full_avail";
    /// Last retention mode the store ran under, stored under [`FULL_AVAIL_NAMESPACE`].
    pub const PREVIOUS_MODE_KEY: &str = "previous_mode";
}

/// Interface used to store and retrieve settings from the database.
/// To store block data, use the [`BlockStore`] trait.
pub trait SettingsStore {
    /// Reads binary field from the Settings store. This should be used for
    /// non-serializable data. For serializable data, use [`SettingsStoreExt::read_obj`].
    fn read_bin(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;

    /// Writes binary field to the Settings store. This should be used for
    /// non-serializable data. For serializable data, use [`SettingsStoreExt::write_obj`].
    ///
    /// A write either fully replaces the previous value or leaves it untouched.
    fn write_bin(&self, key: &str, value: &[u8]) -> anyhow::Result<()>;

    /// Removes a key. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> anyhow::Result<()>;

    /// Returns `Ok(true)` if key exists in store.
    fn exists(&self, key: &str) -> anyhow::Result<bool>;

    /// Returns all setting keys.
    fn setting_keys(&self) -> anyhow::Result<Vec<String>>;
}

impl<T: ?Sized + SettingsStore> SettingsStore for &T {
    fn read_bin(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        SettingsStore::read_bin(*self, key)
    }

    fn write_bin(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        SettingsStore::write_bin(*self, key, value)
    }

    fn delete(&self, key: &str) -> anyhow::Result<()> {
        SettingsStore::delete(*self, key)
    }

    fn exists(&self, key: &str) -> anyhow::Result<bool> {
        SettingsStore::exists(*self, key)
    }

    fn setting_keys(&self) -> anyhow::Result<Vec<String>> {
        SettingsStore::setting_keys(*self)
    }
}

impl<T: ?Sized + SettingsStore> SettingsStore for Arc<T> {
    fn read_bin(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        SettingsStore::read_bin(self.as_ref(), key)
    }

    fn write_bin(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        SettingsStore::write_bin(self.as_ref(), key, value)
    }

    fn delete(&self, key: &str) -> anyhow::Result<()> {
        SettingsStore::delete(self.as_ref(), key)
    }

    fn exists(&self, key: &str) -> anyhow::Result<bool> {
        SettingsStore::exists(self.as_ref(), key)
    }

    fn setting_keys(&self) -> anyhow::Result<Vec<String>> {
        SettingsStore::setting_keys(self.as_ref())
    }
}

/// Extension trait for the [`SettingsStore`] trait. It is implemented for all types that implement
/// [`SettingsStore`].
/// It provides methods for writing and reading any serializable object from the store.
pub trait SettingsStoreExt {
    fn read_obj<V: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<V>>;
    fn write_obj<V: Serialize>(&self, key: &str, value: &V) -> anyhow::Result<()>;

    /// Same as [`SettingsStoreExt::read_obj`], but returns an error if the key does not exist.
    fn require_obj<V: DeserializeOwned>(&self, key: &str) -> anyhow::Result<V>;
}

impl<T: ?Sized + SettingsStore> SettingsStoreExt for T {
    fn read_obj<V: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<V>> {
        match self.read_bin(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write_obj<V: Serialize>(&self, key: &str, value: &V) -> anyhow::Result<()> {
        self.write_bin(key, &serde_json::to_vec(value)?)
    }

    fn require_obj<V: DeserializeOwned>(&self, key: &str) -> anyhow::Result<V> {
        self.read_bin(key)?
            .ok_or_else(|| anyhow::anyhow!("Key {key} not found"))
            .and_then(|bytes| serde_json::from_slice(&bytes).map_err(Into::into))
    }
}

/// A view of a [`SettingsStore`] where every key lives under `/<namespace>/`.
#[derive(Debug, Clone)]
pub struct Namespaced<DB> {
    db: DB,
    prefix: String,
}

impl<DB> Namespaced<DB> {
    pub fn new(db: DB, namespace: &str) -> Self {
        Self {
            db,
            prefix: format!("/{}/", namespace.trim_matches('/')),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key.trim_start_matches('/'))
    }
}

impl<DB: SettingsStore> SettingsStore for Namespaced<DB> {
    fn read_bin(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        self.db.read_bin(&self.key(key))
    }

    fn write_bin(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        self.db.write_bin(&self.key(key), value)
    }

    fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.db.delete(&self.key(key))
    }

    fn exists(&self, key: &str) -> anyhow::Result<bool> {
        self.db.exists(&self.key(key))
    }

    fn setting_keys(&self) -> anyhow::Result<Vec<String>> {
        Ok(self
            .db
            .setting_keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&self.prefix).map(str::to_owned))
            .collect())
    }
}

/// Block data keyed by height. Only the existence check, retrieval and
/// deletion are consumed by retention logic; encoding of the stored data is
/// the owner's business.
#[async_trait]
pub trait BlockStore: Send + Sync {
    async fn has_by_height(&self, height: u64) -> anyhow::Result<bool>;

    async fn get_by_height(&self, height: u64) -> anyhow::Result<Option<Bytes>>;

    async fn put(&self, height: u64, data: Bytes) -> anyhow::Result<()>;

    /// Deletes the data stored for `height`. Deleting a height that has no
    /// data is a successful no-op.
    async fn delete_by_height(&self, height: u64) -> anyhow::Result<()>;
}

#[async_trait]
impl<T: ?Sized + BlockStore> BlockStore for Arc<T> {
    async fn has_by_height(&self, height: u64) -> anyhow::Result<bool> {
        self.as_ref().has_by_height(height).await
    }

    async fn get_by_height(&self, height: u64) -> anyhow::Result<Option<Bytes>> {
        self.as_ref().get_by_height(height).await
    }

    async fn put(&self, height: u64, data: Bytes) -> anyhow::Result<()> {
        self.as_ref().put(height, data).await
    }

    async fn delete_by_height(&self, height: u64) -> anyhow::Result<()> {
        self.as_ref().delete_by_height(height).await
    }
}

/// Traits for collecting DB stats
pub trait DBStatistics {
    fn get_statistics(&self) -> Option<String> {
        None
    }
}

impl<DB: DBStatistics> DBStatistics for Arc<DB> {
    fn get_statistics(&self) -> Option<String> {
        self.as_ref().get_statistics()
    }
}

pub mod db_engine {
    use std::path::{Path, PathBuf};

    pub type Db = crate::db::parity_db::ParityDb;
    pub type DbConfig = crate::db::parity_db_config::ParityDbConfig;
    const DIR_NAME: &str = "paritydb";

    pub fn db_root(data_root: &Path) -> PathBuf {
        data_root.join(DIR_NAME)
    }

    pub fn open_db(path: &Path, config: &DbConfig) -> anyhow::Result<Db> {
        Db::open(path, config)
    }
}
