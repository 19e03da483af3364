// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{BlockStore, SettingsStore};
use ahash::HashMap;
use async_trait::async_trait;
use bytes::Bytes;
use itertools::Itertools;
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct MemoryDB {
    blocks_db: RwLock<HashMap<u64, Bytes>>,
    settings_db: RwLock<HashMap<String, Vec<u8>>>,
}

impl SettingsStore for MemoryDB {
    fn read_bin(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.settings_db.read().get(key).cloned())
    }

    fn write_bin(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        self.settings_db
            .write()
            .insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.settings_db.write().remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.settings_db.read().contains_key(key))
    }

    fn setting_keys(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.settings_db.read().keys().cloned().collect_vec())
    }
}

#[async_trait]
impl BlockStore for MemoryDB {
    async fn has_by_height(&self, height: u64) -> anyhow::Result<bool> {
        Ok(self.blocks_db.read().contains_key(&height))
    }

    async fn get_by_height(&self, height: u64) -> anyhow::Result<Option<Bytes>> {
        Ok(self.blocks_db.read().get(&height).cloned())
    }

    async fn put(&self, height: u64, data: Bytes) -> anyhow::Result<()> {
        self.blocks_db.write().insert(height, data);
        Ok(())
    }

    async fn delete_by_height(&self, height: u64) -> anyhow::Result<()> {
        self.blocks_db.write().remove(&height);
        Ok(())
    }
}
