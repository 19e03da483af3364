// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use super::open_existing;
use crate::db::DBStatistics as _;
use crate::db::db_engine::db_root;
use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum DBCommands {
    /// Show DB stats
    Stats {
        /// Node store directory
        #[arg(long)]
        db: PathBuf,
    },
}

impl DBCommands {
    pub async fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Stats { db } => {
                let store = open_existing(&db)?;
                println!("Database path: {}", db_root(&db).display());
                match store.db().get_statistics() {
                    Some(stats) => println!("# DB statistics:\n{stats}"),
                    None => println!(
                        "Statistics not enabled. Set parity_db.enable_statistics to true in {}",
                        db.join(crate::node::CONFIG_FILE_NAME).display()
                    ),
                }
                Ok(())
            }
        }
    }
}
