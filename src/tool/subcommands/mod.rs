// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod db_cmd;
pub mod retention_cmd;

use crate::db::db_engine::Db;
use crate::node::NodeStore;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Command-line options for the `canopy-tool` binary
#[derive(Parser)]
#[command(
    name = "canopy-tool",
    version,
    about = "Retention state inspection for canopy node stores"
)]
pub struct Cli {
    /// Optional TOML file with the logging configuration, used with `--log-dir`
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Also write logs to hourly rotated files in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub cmd: Subcommand,
}

/// canopy-tool sub-commands
#[derive(clap::Subcommand)]
pub enum Subcommand {
    /// Inspect and validate the retention state of a node store
    #[command(subcommand)]
    Retention(retention_cmd::RetentionCommands),
    /// Database related commands
    #[command(subcommand)]
    Db(db_cmd::DBCommands),
}

/// Opens the node store at `path`, refusing to create a new one.
fn open_existing(path: &Path) -> anyhow::Result<NodeStore<Db>> {
    anyhow::ensure!(path.is_dir(), "no node store at {}", path.display());
    NodeStore::open(path)
}
