// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::db::{BlockStore, Namespaced, SettingsStore, SettingsStoreExt};
use bytes::Bytes;

pub fn read_bin<DB>(db: &DB)
where
    DB: SettingsStore,
{
    let key = "0";
    let value = [1];
    db.write_bin(key, &value).unwrap();
    let res = db.read_bin(key).unwrap().unwrap();
    assert_eq!(value.as_ref(), res.as_slice());
}

pub fn write_read_obj<DB>(db: &DB)
where
    DB: SettingsStore,
{
    let key = "Cthulhu";
    let value = 42;
    db.write_obj(key, &value).unwrap();
    let res: i32 = db.read_obj(key).unwrap().unwrap();
    assert_eq!(value, res);

    // ensure that we are able to overwrite the value.
    // this is to ensure we don't enable settings such as
    // `preimage` for the settings column which would
    // assume that the value is immutable.
    let value = 1337;
    db.write_obj(key, &value).unwrap();
    let res: i32 = db.read_obj(key).unwrap().unwrap();
    assert_eq!(value, res);
}

pub fn exists<DB>(db: &DB)
where
    DB: SettingsStore,
{
    let key = "0";
    let value = [1];
    db.write_bin(key, &value).unwrap();
    let res = db.exists(key).unwrap();
    assert!(res);
}

pub fn does_not_exist<DB>(db: &DB)
where
    DB: SettingsStore,
{
    let key = "Azathoth";

    assert!(!db.exists(key).unwrap());
    assert!(db.read_obj::<i32>(key).unwrap().is_none());
    assert!(db.require_obj::<i32>(key).is_err());
}

pub fn delete<DB>(db: &DB)
where
    DB: SettingsStore,
{
    let key = "Yog-Sothoth";
    db.write_bin(key, b"gate").unwrap();
    db.delete(key).unwrap();
    assert!(!db.exists(key).unwrap());
    // deleting twice is fine
    db.delete(key).unwrap();
}

pub fn namespaces_are_isolated<DB>(db: &DB)
where
    DB: SettingsStore,
{
    let pruner = Namespaced::new(db, "pruner");
    let avail = Namespaced::new(db, "full_avail");
    pruner.write_bin("checkpoint", b"progress").unwrap();
    avail.write_bin("previous_mode", b"archival").unwrap();

    assert!(avail.read_bin("checkpoint").unwrap().is_none());
    assert!(pruner.read_bin("previous_mode").unwrap().is_none());
    assert_eq!(
        db.read_bin("/pruner/checkpoint").unwrap().as_deref(),
        Some(b"progress".as_slice())
    );
    assert_eq!(pruner.setting_keys().unwrap(), vec!["checkpoint".to_owned()]);
}

pub async fn block_data<DB>(db: &DB)
where
    DB: BlockStore,
{
    assert!(!db.has_by_height(1).await.unwrap());
    db.put(1, Bytes::from_static(b"square")).await.unwrap();
    assert!(db.has_by_height(1).await.unwrap());
    assert_eq!(
        db.get_by_height(1).await.unwrap(),
        Some(Bytes::from_static(b"square"))
    );
    db.delete_by_height(1).await.unwrap();
    assert!(!db.has_by_height(1).await.unwrap());
    // already absent data deletes as a no-op
    db.delete_by_height(1).await.unwrap();
}
