// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod cli;
pub mod logger;

use crate::cli_shared::cli::Config;
use anyhow::Context as _;
use std::path::Path;

/// Reads the configuration file at `config_path`, or returns the default
/// configuration when no path is given.
pub fn read_config(config_path: Option<&Path>) -> anyhow::Result<Config> {
    match config_path {
        Some(path) => {
            let toml = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&toml)
                .with_context(|| format!("failed to parse config file {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}
