// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod common;

use canopy::availability::RetentionMode;
use canopy::node::NodeStore;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::common::{config, seed_store, tool};

#[test]
fn archival_check_fails_on_pruned_store() {
    let dir = TempDir::new().unwrap();
    seed_store(dir.path(), RetentionMode::Pruned, None, Some(500));

    tool()
        .arg("retention")
        .arg("check")
        .arg("--mode")
        .arg("archival")
        .arg("--db")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "it is not safe to convert to an archival node",
        ));

    // the refused check did not record anything
    tool()
        .arg("retention")
        .arg("checkpoint")
        .arg("--db")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"previous_mode\":null"))
        .stdout(predicate::str::contains("\"last_pruned_height\":500"));
}

#[test]
fn check_defaults_to_configured_mode() {
    let dir = TempDir::new().unwrap();
    seed_store(dir.path(), RetentionMode::Pruned, None, Some(500));

    tool()
        .arg("retention")
        .arg("check")
        .arg("--db")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("pruned mode allowed"))
        .stdout(predicate::str::contains("availability window: 30days"));
}

#[test]
fn pruned_check_converts_archival_store() {
    let dir = TempDir::new().unwrap();
    seed_store(
        dir.path(),
        RetentionMode::Archival,
        Some(RetentionMode::Archival),
        Some(500),
    );

    tool()
        .arg("retention")
        .arg("check")
        .arg("--mode")
        .arg("pruned")
        .arg("--db")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("checkpoint reset"));

    tool()
        .arg("retention")
        .arg("checkpoint")
        .arg("--db")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"previous_mode\":\"pruned\""))
        .stdout(predicate::str::contains("\"last_pruned_height\":1"));
}

#[test]
fn fresh_store_has_no_retention_state() {
    let dir = TempDir::new().unwrap();
    seed_store(dir.path(), RetentionMode::Archival, None, None);

    tool()
        .arg("retention")
        .arg("checkpoint")
        .arg("--db")
        .arg(dir.path())
        .assert()
        .success()
        .stdout("{\"previous_mode\":null,\"checkpoint\":null}\n");
}

#[test]
fn missing_store_is_an_error() {
    let dir = TempDir::new().unwrap();

    tool()
        .arg("retention")
        .arg("check")
        .arg("--db")
        .arg(dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no node store at"));
}

#[test]
fn db_stats_reports_statistics_when_enabled() {
    let dir = TempDir::new().unwrap();
    let mut config = config(RetentionMode::Pruned);
    config.parity_db.enable_statistics = true;
    NodeStore::init(dir.path(), config).unwrap();

    tool()
        .arg("db")
        .arg("stats")
        .arg("--db")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Database path:"))
        .stdout(predicate::str::contains("# DB statistics:"));
}

#[test]
fn db_stats_without_statistics() {
    let dir = TempDir::new().unwrap();
    seed_store(dir.path(), RetentionMode::Archival, None, None);

    tool()
        .arg("db")
        .arg("stats")
        .arg("--db")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Statistics not enabled"));
}
