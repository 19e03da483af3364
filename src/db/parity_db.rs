// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{BlockStore, DBStatistics, SettingsStore, parity_db_config::ParityDbConfig};

use anyhow::{Context as _, anyhow};
use async_trait::async_trait;
use bytes::Bytes;
use parity_db::{CompressionType, Db, Options};
use strum::{Display, EnumIter, FromRepr, IntoEnumIterator};
use tracing::warn;

/// It is used to determine which column to use for a given entry type.
#[derive(Copy, Clone, Debug, Display, PartialEq, FromRepr, EnumIter)]
#[repr(u8)]
pub(in crate::db) enum DbColumn {
    /// Block data keyed by big-endian height.
    Blocks,
    /// Column for storing node settings, retention state and pruning progress.
    Settings,
}

impl DbColumn {
    fn create_column_options(compression: CompressionType) -> Vec<parity_db::ColumnOptions> {
        DbColumn::iter()
            .map(|col| match col {
                DbColumn::Blocks => parity_db::ColumnOptions {
                    // block data is deleted by the pruner, so entries must be mutable
                    preimage: false,
                    compression,
                    ..Default::default()
                },
                DbColumn::Settings => parity_db::ColumnOptions {
                    // explicitly disable preimage for settings column
                    // othewise we are not able to overwrite entries
                    preimage: false,
                    // This is needed for key retrieval.
                    btree_index: true,
                    compression,
                    ..Default::default()
                },
            })
            .collect()
    }
}

/// Cheap to clone; clones share the underlying database.
#[derive(Clone)]
pub struct ParityDb {
    db: Arc<parity_db::Db>,
    statistics_enabled: bool,
}

impl ParityDb {
    fn to_options(path: PathBuf, config: &ParityDbConfig) -> anyhow::Result<Options> {
        let mut opts = Options::with_columns(&path, DbColumn::iter().count() as u8);
        opts.sync_wal = true;
        opts.sync_data = true;
        opts.stats = config.enable_statistics;
        opts.columns = DbColumn::create_column_options(config.compression()?);
        Ok(opts)
    }

    pub fn open(path: impl Into<PathBuf>, config: &ParityDbConfig) -> anyhow::Result<Self> {
        let path = path.into();
        let opts = Self::to_options(path.clone(), config)?;
        Ok(Self {
            db: Arc::new(
                Db::open_or_create(&opts)
                    .with_context(|| format!("failed to open parity-db at {}", path.display()))?,
            ),
            statistics_enabled: opts.stats,
        })
    }

    pub fn open_existing(path: &Path, config: &ParityDbConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(path.is_dir(), "no database found at {}", path.display());
        Self::open(path, config)
    }

    fn height_key(height: u64) -> [u8; 8] {
        height.to_be_bytes()
    }

    fn read_from_column<K>(&self, key: K, column: DbColumn) -> anyhow::Result<Option<Vec<u8>>>
    where
        K: AsRef<[u8]>,
    {
        self.db
            .get(column as u8, key.as_ref())
            .map_err(|e| anyhow!("error from column {column}: {e}"))
    }

    fn write_to_column<K>(
        &self,
        key: K,
        value: Option<Vec<u8>>,
        column: DbColumn,
    ) -> anyhow::Result<()>
    where
        K: AsRef<[u8]>,
    {
        let tx = [(column as u8, key.as_ref(), value)];
        self.db
            .commit(tx)
            .map_err(|e| anyhow!("error writing to column {column}: {e}"))
    }

    /// Commits to the blocks column off the async workers, as commits wait
    /// for the write-ahead log to be synced.
    async fn write_blocking(&self, height: u64, value: Option<Vec<u8>>) -> anyhow::Result<()> {
        let db = self.clone();
        tokio::task::spawn_blocking(move || {
            db.write_to_column(Self::height_key(height), value, DbColumn::Blocks)
        })
        .await?
    }

    fn exists_in_column<K>(&self, key: K, column: DbColumn) -> anyhow::Result<bool>
    where
        K: AsRef<[u8]>,
    {
        self.db
            .get_size(column as u8, key.as_ref())
            .map(|size| size.is_some())
            .context("error checking if key exists")
    }
}

impl SettingsStore for ParityDb {
    fn read_bin(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        self.read_from_column(key.as_bytes(), DbColumn::Settings)
    }

    fn write_bin(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        self.write_to_column(key.as_bytes(), Some(value.to_vec()), DbColumn::Settings)
    }

    fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.write_to_column(key.as_bytes(), None, DbColumn::Settings)
    }

    fn exists(&self, key: &str) -> anyhow::Result<bool> {
        self.exists_in_column(key.as_bytes(), DbColumn::Settings)
    }

    fn setting_keys(&self) -> anyhow::Result<Vec<String>> {
        let mut iter = self.db.iter(DbColumn::Settings as u8)?;
        iter.seek_to_first()?;
        let mut keys = vec![];
        while let Some((key, _)) = iter.next()? {
            keys.push(String::from_utf8(key)?);
        }
        Ok(keys)
    }
}

#[async_trait]
impl BlockStore for ParityDb {
    async fn has_by_height(&self, height: u64) -> anyhow::Result<bool> {
        self.exists_in_column(Self::height_key(height), DbColumn::Blocks)
    }

    async fn get_by_height(&self, height: u64) -> anyhow::Result<Option<Bytes>> {
        Ok(self
            .read_from_column(Self::height_key(height), DbColumn::Blocks)?
            .map(Bytes::from))
    }

    async fn put(&self, height: u64, data: Bytes) -> anyhow::Result<()> {
        self.write_blocking(height, Some(data.to_vec())).await
    }

    async fn delete_by_height(&self, height: u64) -> anyhow::Result<()> {
        self.write_blocking(height, None).await
    }
}

impl DBStatistics for ParityDb {
    fn get_statistics(&self) -> Option<String> {
        if !self.statistics_enabled {
            return None;
        }

        let mut buf = Vec::new();
        if let Err(err) = self.db.write_stats_text(&mut buf, None) {
            warn!("Unable to write database statistics: {err}");
            return None;
        }

        match String::from_utf8(buf) {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!("Malformed statistics: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::db::tests::db_utils::parity::TempParityDB;

    use super::*;

    #[tokio::test]
    async fn write_read_different_columns_test() -> anyhow::Result<()> {
        let db = TempParityDB::new();
        db.put(7, Bytes::from_static(b"Cthulhu")).await?;
        db.write_bin("dagon", b"bloop")?;

        let actual = db
            .read_from_column(ParityDb::height_key(7), DbColumn::Blocks)?
            .expect("data not found");
        assert_eq!(b"Cthulhu".as_slice(), actual.as_slice());
        // assert that the data is NOT in the other column
        assert!(
            db.read_from_column(ParityDb::height_key(7), DbColumn::Settings)?
                .is_none()
        );

        let actual = db
            .read_from_column(b"dagon", DbColumn::Settings)?
            .expect("data not found");
        assert_eq!(b"bloop".as_slice(), actual.as_slice());
        assert!(db.read_from_column(b"dagon", DbColumn::Blocks)?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn block_data_survives_reopen() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("paritydb");
        {
            let db = ParityDb::open(&path, &Default::default())?;
            db.put(3, Bytes::from_static(b"eds")).await?;
            db.write_bin("/pruner/checkpoint", b"{}")?;
        }
        let db = ParityDb::open_existing(&path, &Default::default())?;
        assert!(db.has_by_height(3).await?);
        assert_eq!(db.read_bin("/pruner/checkpoint")?, Some(b"{}".to_vec()));
        db.delete_by_height(3).await?;
        assert!(!db.has_by_height(3).await?);
        Ok(())
    }

    #[test]
    fn open_existing_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ParityDb::open_existing(&dir.path().join("missing"), &Default::default()).is_err());
    }

    #[tokio::test]
    async fn statistics_only_when_enabled() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let db = ParityDb::open(dir.path().join("plain"), &Default::default())?;
        assert_eq!(db.get_statistics(), None);

        let config = ParityDbConfig {
            enable_statistics: true,
            ..Default::default()
        };
        let db = ParityDb::open(dir.path().join("stats"), &config)?;
        db.put(1, Bytes::from_static(b"blob")).await?;
        assert!(db.get_statistics().is_some());
        Ok(())
    }
}
