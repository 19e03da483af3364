// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::ffi::OsString;

use super::subcommands::{Cli, Subcommand};
use crate::cli_shared::logger::{setup_logger, setup_minimal_logger};
use crate::cli_shared::read_config;
use clap::Parser as _;

pub fn main<ArgT>(args: impl IntoIterator<Item = ArgT>) -> anyhow::Result<()>
where
    ArgT: Into<OsString> + Clone,
{
    // Capture Cli inputs
    let Cli {
        config,
        log_dir,
        cmd,
    } = Cli::parse_from(args);
    match &log_dir {
        Some(log_dir) => {
            let config = read_config(config.as_deref())?;
            setup_logger(&config.log, Some(log_dir.as_path()))
        }
        None => setup_minimal_logger(),
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            // Run command
            match cmd {
                Subcommand::Retention(cmd) => cmd.run().await,
                Subcommand::Db(cmd) => cmd.run().await,
            }
        })
}
