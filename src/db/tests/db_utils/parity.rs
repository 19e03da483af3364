// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

use crate::db::db_engine::{Db, DbConfig, db_root, open_db};

/// ParityDB in a temporary node directory, wiped when dropped. The handle can
/// be closed and opened again to observe what actually reached the disk.
pub struct TempParityDB {
    db: Arc<Db>,
    path: PathBuf,
    _dir: tempfile::TempDir,
}

impl TempParityDB {
    pub fn new() -> TempParityDB {
        let dir = tempfile::tempdir().unwrap();
        let path = db_root(dir.path());
        TempParityDB {
            db: Arc::new(open_db(&path, &DbConfig::default()).unwrap()),
            path,
            _dir: dir,
        }
    }

    /// Shared handle, as handed to stores that take ownership of their
    /// database.
    pub fn shared(&self) -> Arc<Db> {
        self.db.clone()
    }

    /// Closes the database and opens it again. Panics if a handle from
    /// [`TempParityDB::shared`] is still alive.
    pub fn reopen(self) -> TempParityDB {
        let TempParityDB { db, path, _dir } = self;
        assert_eq!(Arc::strong_count(&db), 1, "database handle still in use");
        drop(db);
        TempParityDB {
            db: Arc::new(open_db(&path, &DbConfig::default()).unwrap()),
            path,
            _dir,
        }
    }
}

impl Deref for TempParityDB {
    type Target = Db;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}
